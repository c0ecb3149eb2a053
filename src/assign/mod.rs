//! 下行 → 上行节点的均衡分配
//!
//! 每台交换机独立处理，按发现顺序为每个下行节点挑选一个上行节点，
//! 使流量尽量均匀地分布在上行端口上；所有交换机共享同一个上行节点容量账本。

// 子模块声明
mod balance;
mod ledger;

// 重新导出公共接口
pub use balance::{
    AssignOpts, AssignmentResult, BalancedAssigner, DEFAULT_CAPACITY, DEFAULT_THRESHOLD_DIVISOR,
    Outcome, SwitchAssignment, compute_balanced_assignment,
};
pub use ledger::CapacityLedger;
