//! 交换机拓扑模型
//!
//! 按交换机聚合路由表解析出的事实：哪些上行（存储类）节点经由哪个端口可达，
//! 哪些下行（计算类）节点挂在哪个端口上。

// 子模块声明
mod collect;
mod error;
mod id;
mod switch;
mod topology;

// 重新导出公共接口
pub use crate::parse::PortNum;
pub use collect::collect_topology;
pub use error::FabricError;
pub use id::{SwitchLid, parse_lid_list};
pub use switch::Switch;
pub(crate) use switch::fmt_port_counts;
pub use topology::{TopologyMap, build_topology};
