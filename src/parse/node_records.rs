//! 节点与交换机枚举输出解析
//!
//! - `saquery NR`：每条记录先给出 `lid....<值>` 行，随后才是
//!   `NodeDescription....<描述>` 行；
//! - `ibswitches`：每台交换机一行，形如 `... lid 220 lmc 0 ...`。

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::number::parse_number;

static RECORD_LID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\slid\.*([0-9a-fA-Fx]*)$").expect("record lid regex"));

static SWITCH_LID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.* lid ([0-9a-f]*) lmc ").expect("switch lid regex"));

/// 从节点记录输出中找出描述以 `cluster` 开头的节点 LID，按出现顺序返回。
pub fn cluster_lids(text: &str, cluster: &str) -> Vec<u32> {
    let desc_re = match Regex::new(&format!(r"\sNodeDescription\.*{}", regex::escape(cluster))) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut lids = Vec::new();
    let mut current: Option<u32> = None;
    for line in text.lines() {
        if let Some(caps) = RECORD_LID_RE.captures(line) {
            current = parse_number(&caps[1]);
        }
        if desc_re.is_match(line) {
            match current {
                Some(lid) => lids.push(lid),
                None => trace!(line, "节点描述之前没有 lid，跳过"),
            }
        }
    }
    lids
}

/// 从交换机枚举输出中取出全部交换机 LID。
pub fn switch_lids(text: &str) -> Vec<u32> {
    text.lines()
        .filter_map(|line| SWITCH_LID_RE.captures(line))
        .filter_map(|caps| parse_number(&caps[1]))
        .collect()
}
