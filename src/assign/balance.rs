//! 阶梯阈值的均衡分配
//!
//! 对第 k 个（从 0 计）下行节点，阈值为 `k / threshold_divisor`；只有当前计数
//! 不超过阈值的上行端口才可被选中。端口按编号升序扫描，端口内按登记顺序挑选
//! 第一个仍有剩余容量的上行节点。找不到时记录失败并继续下一个下行节点。
//!
//! k 统计的是已处理的下行节点（含失败的），因此某个节点失败后阈值仍会照常抬升。

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::ledger::CapacityLedger;
use crate::fabric::{PortNum, Switch, SwitchLid, TopologyMap};

/// 每个上行节点默认最多承载的下行节点数
pub const DEFAULT_CAPACITY: u32 = 2;

/// 每处理这么多个下行节点，阈值抬升一级
pub const DEFAULT_THRESHOLD_DIVISOR: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignOpts {
    pub capacity: u32,
    pub threshold_divisor: usize,
}

impl Default for AssignOpts {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            threshold_divisor: DEFAULT_THRESHOLD_DIVISOR,
        }
    }
}

/// 单个下行节点的分配结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Assigned {
        downstream: String,
        upstream: String,
        port: PortNum,
    },
    Failed {
        downstream: String,
    },
}

/// 单台交换机的分配结果
#[derive(Debug, Clone, Serialize)]
pub struct SwitchAssignment {
    pub lid: SwitchLid,
    /// 按处理顺序
    pub outcomes: Vec<Outcome>,
    /// 每个上行端口最终分到的下行节点数
    pub port_counts: BTreeMap<PortNum, usize>,
}

impl SwitchAssignment {
    /// (下行, 上行) 对，按处理顺序
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Assigned {
                downstream,
                upstream,
                ..
            } => Some((downstream.as_str(), upstream.as_str())),
            Outcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Failed { downstream } => Some(downstream.as_str()),
            Outcome::Assigned { .. } => None,
        })
    }
}

impl fmt::Display for SwitchAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# SW {}", self.lid)?;
        for outcome in &self.outcomes {
            match outcome {
                Outcome::Assigned {
                    downstream,
                    upstream,
                    ..
                } => writeln!(f, "{downstream}, {upstream}")?,
                Outcome::Failed { downstream } => {
                    writeln!(f, "ERROR: Failed to find uplink for {downstream}")?
                }
            }
        }
        write!(f, "# ")?;
        crate::fabric::fmt_port_counts(f, &self.port_counts)?;
        writeln!(f)
    }
}

/// 全部交换机的分配结果，顺序与拓扑一致
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentResult {
    pub switches: Vec<SwitchAssignment>,
}

impl AssignmentResult {
    pub fn get(&self, lid: SwitchLid) -> Option<&SwitchAssignment> {
        self.switches.iter().find(|s| s.lid == lid)
    }

    pub fn assigned(&self) -> usize {
        self.switches.iter().map(|s| s.pairs().count()).sum()
    }

    pub fn failed(&self) -> usize {
        self.switches.iter().map(|s| s.failures().count()).sum()
    }
}

impl fmt::Display for AssignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sw in &self.switches {
            write!(f, "{sw}")?;
        }
        Ok(())
    }
}

/// 均衡分配器，持有跨交换机共享的容量账本。
#[derive(Debug, Clone)]
pub struct BalancedAssigner {
    ledger: CapacityLedger,
    threshold_divisor: usize,
}

impl BalancedAssigner {
    pub fn new(opts: AssignOpts) -> Self {
        Self::with_ledger(CapacityLedger::new(opts.capacity), opts.threshold_divisor)
    }

    /// 使用预先标记过的账本（例如保留了一半上行节点池）。
    pub fn with_ledger(ledger: CapacityLedger, threshold_divisor: usize) -> Self {
        Self {
            ledger,
            threshold_divisor: threshold_divisor.max(1),
        }
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    #[tracing::instrument(skip_all, fields(switches = topology.len(), divisor = self.threshold_divisor))]
    pub fn run(&mut self, topology: &TopologyMap) -> AssignmentResult {
        let switches: Vec<_> = topology.iter().map(|sw| self.assign_switch(sw)).collect();
        let result = AssignmentResult { switches };
        info!(
            assigned = result.assigned(),
            failed = result.failed(),
            "✅ 分配完成"
        );
        result
    }

    pub fn assign_switch(&mut self, sw: &Switch) -> SwitchAssignment {
        let mut port_counts: BTreeMap<PortNum, usize> =
            sw.uplink_ports().keys().map(|&port| (port, 0)).collect();
        let mut outcomes = Vec::with_capacity(sw.downstream_nodes().len());

        for (processed, down) in sw.downstream_nodes().iter().enumerate() {
            let threshold = processed / self.threshold_divisor;
            match self.pick(sw, &port_counts, threshold) {
                Some((port, up)) => {
                    self.ledger.take(&up);
                    *port_counts.entry(port).or_default() += 1;
                    debug!(lid = %sw.lid(), port, down = %down, up = %up, threshold, "分配");
                    outcomes.push(Outcome::Assigned {
                        downstream: down.clone(),
                        upstream: up,
                        port,
                    });
                }
                None => {
                    warn!(lid = %sw.lid(), down = %down, threshold, "找不到可用上行");
                    outcomes.push(Outcome::Failed {
                        downstream: down.clone(),
                    });
                }
            }
        }

        SwitchAssignment {
            lid: sw.lid(),
            outcomes,
            port_counts,
        }
    }

    fn pick(
        &self,
        sw: &Switch,
        port_counts: &BTreeMap<PortNum, usize>,
        threshold: usize,
    ) -> Option<(PortNum, String)> {
        for (&port, nodes) in sw.uplink_ports() {
            if port_counts.get(&port).copied().unwrap_or(0) > threshold {
                continue;
            }
            if let Some(up) = nodes.iter().find(|n| self.ledger.remaining(n) > 0) {
                return Some((port, up.clone()));
            }
        }
        None
    }
}

/// 用全新的账本（无预留）对整个拓扑做一次分配。
pub fn compute_balanced_assignment(
    topology: &TopologyMap,
    capacity: u32,
    threshold_divisor: usize,
) -> AssignmentResult {
    BalancedAssigner::new(AssignOpts {
        capacity,
        threshold_divisor,
    })
    .run(topology)
}
