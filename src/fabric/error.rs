//! 拓扑相关错误

use thiserror::Error;

use super::id::SwitchLid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FabricError {
    /// 交换机上从未登记过该上行节点
    #[error("switch {switch} has no uplink toward {node}")]
    UnknownUplink { switch: SwitchLid, node: String },

    /// 没有任何交换机把该节点登记为下行节点
    #[error("no switch owns downstream node {0}")]
    UnknownDownstream(String),

    #[error("invalid lid: {0:?}")]
    InvalidLid(String),

    /// 仿真所需的节点池为空
    #[error("{0} node pool is empty")]
    EmptyNodePool(&'static str),
}
