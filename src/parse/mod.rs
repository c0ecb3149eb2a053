//! 设备输出解析模块
//!
//! 把外部诊断命令（`ibroute`、`saquery NR`、`ibswitches`）产生的文本
//! 逐行转换为结构化事实。所有解析器都是容错的：不认识的行直接跳过，绝不报错。

// 子模块声明
mod lft_dump;
mod node_records;
mod number;
mod route_dump;

// 重新导出公共接口
pub use lft_dump::{route_section, uplink_nodes_on_port};
pub use node_records::{cluster_lids, switch_lids};
pub use number::{PortNum, parse_number};
pub use route_dump::{
    DOWNLINK_PORT_MAX, NodeClass, RouteFact, RouteLine, RoutePatterns, parse_route_dump,
};
