//! 单台交换机的端口视图

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{trace, warn};

use super::error::FabricError;
use super::id::SwitchLid;
use crate::parse::{DOWNLINK_PORT_MAX, NodeClass, PortNum, RouteFact};

/// 交换机
///
/// 上行端口下的节点列表保留登记顺序且允许重复（同一节点在转储里出现多次就登记多次）；
/// `uplink_port_of` 记录每个上行节点最后一次登记的端口。
#[derive(Debug, Clone)]
pub struct Switch {
    lid: SwitchLid,
    uplink_cnt: BTreeMap<PortNum, usize>,
    uplink_ports: BTreeMap<PortNum, Vec<String>>,
    downlink_ports: BTreeMap<PortNum, Vec<String>>,
    uplink_port_of: HashMap<String, PortNum>,
    /// 去重后的下行节点，按发现顺序
    downstream: Vec<String>,
}

impl Switch {
    pub fn new(lid: SwitchLid) -> Self {
        Self {
            lid,
            uplink_cnt: BTreeMap::new(),
            uplink_ports: BTreeMap::new(),
            downlink_ports: BTreeMap::new(),
            uplink_port_of: HashMap::new(),
            downstream: Vec::new(),
        }
    }

    /// 由按行序排列的事实构建交换机。
    pub fn from_facts<I>(lid: SwitchLid, facts: I) -> Self
    where
        I: IntoIterator<Item = RouteFact>,
    {
        let mut sw = Self::new(lid);
        for fact in facts {
            sw.apply(fact);
        }
        sw
    }

    pub fn apply(&mut self, fact: RouteFact) {
        match fact.class {
            NodeClass::Upstream => self.add_uplink(fact.port, fact.node),
            NodeClass::Downstream => self.add_downlink(fact.port, fact.node),
        }
    }

    pub fn lid(&self) -> SwitchLid {
        self.lid
    }

    pub fn add_uplink(&mut self, port: PortNum, node: impl Into<String>) {
        let node = node.into();
        trace!(lid = %self.lid, port, node = %node, "登记上行节点");
        *self.uplink_cnt.entry(port).or_default() += 1;
        self.uplink_port_of.insert(node.clone(), port);
        self.uplink_ports.entry(port).or_default().push(node);
    }

    /// 登记下行节点；端口号超过 [`DOWNLINK_PORT_MAX`] 时忽略。
    pub fn add_downlink(&mut self, port: PortNum, node: impl Into<String>) {
        let node = node.into();
        if port > DOWNLINK_PORT_MAX {
            warn!(lid = %self.lid, port, node = %node, "下行端口号越界，忽略");
            return;
        }
        trace!(lid = %self.lid, port, node = %node, "登记下行节点");
        if !self.is_downlink_owner(&node) {
            self.downstream.push(node.clone());
        }
        self.downlink_ports.entry(port).or_default().push(node);
    }

    /// 节点最近一次登记的上行端口。
    pub fn get_uplink_port(&self, node: &str) -> Result<PortNum, FabricError> {
        self.uplink_port_of
            .get(node)
            .copied()
            .ok_or_else(|| FabricError::UnknownUplink {
                switch: self.lid,
                node: node.to_string(),
            })
    }

    pub fn is_downlink_owner(&self, node: &str) -> bool {
        self.downlink_ports
            .values()
            .any(|nodes| nodes.iter().any(|n| n == node))
    }

    /// 上行端口 → 节点列表，端口升序
    pub fn uplink_ports(&self) -> &BTreeMap<PortNum, Vec<String>> {
        &self.uplink_ports
    }

    pub fn downlink_ports(&self) -> &BTreeMap<PortNum, Vec<String>> {
        &self.downlink_ports
    }

    /// 每个上行端口累计登记次数
    pub fn uplink_counts(&self) -> &BTreeMap<PortNum, usize> {
        &self.uplink_cnt
    }

    pub fn downstream_nodes(&self) -> &[String] {
        &self.downstream
    }

    pub fn is_edge(&self) -> bool {
        !self.uplink_ports.is_empty() && !self.downlink_ports.is_empty()
    }
}

/// 端口计数打印成 `{1: 2, 7: 1}`
pub(crate) fn fmt_port_counts(
    f: &mut impl fmt::Write,
    counts: &BTreeMap<PortNum, usize>,
) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (port, cnt)) in counts.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{port}: {cnt}")?;
    }
    write!(f, "}}")
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_port_counts(f, &self.uplink_cnt)?;
        writeln!(f)?;
        for (port, nodes) in &self.uplink_ports {
            write!(f, "   UP {port}: ")?;
            for node in nodes {
                write!(f, "{node},")?;
            }
            writeln!(f)?;
        }
        for (port, nodes) in &self.downlink_ports {
            write!(f, "   Down {port}: ")?;
            for node in nodes {
                write!(f, "{node},")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
