//! 上行节点容量账本

use std::collections::HashMap;

/// 每个上行节点最多可被分配 `capacity` 次；未出现过的节点视为满额可用。
#[derive(Debug, Clone)]
pub struct CapacityLedger {
    capacity: u32,
    used: HashMap<String, u32>,
}

impl CapacityLedger {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            used: HashMap::new(),
        }
    }

    /// 上行节点池为 `<prefix>1..=<prefix>pool`，只有前一半应承载流量：
    /// 把 `<prefix>(pool/2+1)..=<prefix>pool` 预先标记为已满。
    pub fn with_reserved_pool(capacity: u32, prefix: &str, pool: usize) -> Self {
        let mut ledger = Self::new(capacity);
        for i in pool / 2 + 1..=pool {
            ledger.mark_exhausted(format!("{prefix}{i}"));
        }
        ledger
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn mark_exhausted(&mut self, node: impl Into<String>) {
        self.used.insert(node.into(), self.capacity);
    }

    pub fn used(&self, node: &str) -> u32 {
        self.used.get(node).copied().unwrap_or(0)
    }

    pub fn remaining(&self, node: &str) -> u32 {
        self.capacity.saturating_sub(self.used(node))
    }

    /// 占用一次容量；已满时返回 `false`。
    pub fn take(&mut self, node: &str) -> bool {
        if self.remaining(node) == 0 {
            return false;
        }
        *self.used.entry(node.to_string()).or_default() += 1;
        true
    }
}
