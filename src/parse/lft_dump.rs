//! 多交换机路由表转储（`dump_lfts` 风格）分段

use std::sync::LazyLock;

use regex::Regex;

use super::number::PortNum;
use super::route_dump::{NodeClass, RoutePatterns};

static SECTION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Unicast lids .* Lid ([0-9]*) guid").expect("section header regex")
});

/// 取出某台交换机（按 LID）那一段的所有行，包含表头行。
///
/// 每段以 `Unicast lids ... Lid <n> guid ...` 开头；找不到时返回空。
pub fn route_section(text: &str, lid: u32) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut inside = false;

    for line in text.lines() {
        if let Some(caps) = SECTION_HEADER_RE.captures(line) {
            let header_lid = caps[1].parse::<u32>().ok();
            if inside && header_lid != Some(lid) {
                break;
            }
            inside = header_lid == Some(lid);
        }
        if inside {
            lines.push(line);
        }
    }
    lines
}

/// 转储中某台交换机经 `port` 路由到的上行节点，按出现顺序。
pub fn uplink_nodes_on_port(
    text: &str,
    lid: u32,
    port: PortNum,
    patterns: &RoutePatterns,
) -> Vec<String> {
    route_section(text, lid)
        .into_iter()
        .flat_map(|line| patterns.classify(line).facts().to_vec())
        .filter(|f| f.port == port && f.class == NodeClass::Upstream)
        .map(|f| f.node)
        .collect()
}
