//! 上行端口负载的蒙特卡洛仿真
//!
//! 把一批逻辑“文件”分别放到计算节点与存储节点上：存储节点严格轮转，
//! 计算节点在轮转基础上做随机置换。每个文件经由其计算节点所在交换机、
//! 朝向其存储节点的上行端口传输，统计各 (交换机, 端口) 的文件数。

// 子模块声明
mod stats;
mod trial;

// 重新导出公共接口
pub use stats::LoadStats;
pub use trial::{Bucket, NodePools, SimOpts, Simulation, SimulationTrial, run_simulation_trial};
