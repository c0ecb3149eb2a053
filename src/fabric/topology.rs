//! 全局拓扑：交换机 LID → 交换机
//!
//! 每次运行构建一次，所有工作线程完成后不再修改。

use std::collections::HashMap;

use super::id::SwitchLid;
use super::switch::Switch;
use crate::parse::RouteFact;

/// 按插入顺序保存交换机的拓扑表
#[derive(Debug, Clone, Default)]
pub struct TopologyMap {
    switches: Vec<Switch>,
    index: HashMap<SwitchLid, usize>,
}

impl TopologyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入交换机；同一 LID 已存在时就地替换，保持原有位置。
    pub fn insert(&mut self, sw: Switch) {
        match self.index.get(&sw.lid()) {
            Some(&idx) => self.switches[idx] = sw,
            None => {
                self.index.insert(sw.lid(), self.switches.len());
                self.switches.push(sw);
            }
        }
    }

    pub fn get(&self, lid: SwitchLid) -> Option<&Switch> {
        self.index.get(&lid).map(|&idx| &self.switches[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Switch> {
        self.switches.iter()
    }

    pub fn lids(&self) -> impl Iterator<Item = SwitchLid> + '_ {
        self.switches.iter().map(Switch::lid)
    }

    pub fn len(&self) -> usize {
        self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }

    /// 把 `node` 登记为下行节点的第一台交换机。
    pub fn downlink_owner(&self, node: &str) -> Option<&Switch> {
        self.switches.iter().find(|sw| sw.is_downlink_owner(node))
    }
}

/// 由每台交换机的事实序列构建拓扑，顺序与输入一致。
pub fn build_topology<I, F>(facts_per_switch: I) -> TopologyMap
where
    I: IntoIterator<Item = (SwitchLid, F)>,
    F: IntoIterator<Item = RouteFact>,
{
    let mut topo = TopologyMap::new();
    for (lid, facts) in facts_per_switch {
        topo.insert(Switch::from_facts(lid, facts));
    }
    topo
}
