//! 单交换机路由表（`ibroute <lid>`）解析
//!
//! 典型的一行：
//!
//! ```text
//! 0x0012 007 : (Channel Adapter portguid 0x0002c9030000a1b2: 'grove12 HCA-1')
//! ```
//!
//! 从中提取 (出端口, 引号内的节点描述)，再按调用方给出的两个名字前缀
//! 把节点归类为上行（存储类）或下行（计算类）。

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::number::{PortNum, parse_number};

/// 下行端口号上限：只有编号不超过此值的端口才会登记下行节点。
pub const DOWNLINK_PORT_MAX: PortNum = 24;

static ROUTE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*\s([0-9a-fA-Fx]*)\s:\s.*'(.*)'").expect("route line regex")
});

/// 节点类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// 经上行端口可达的存储类节点
    Upstream,
    /// 挂在下行端口上的计算类节点
    Downstream,
}

/// 一条已归类的端口事实
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFact {
    pub port: PortNum,
    pub node: String,
    pub class: NodeClass,
}

/// 单行的分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteLine {
    /// 行形状匹配；`facts` 可以为 0、1 或 2 条
    Matched {
        port: PortNum,
        descriptor: String,
        facts: Vec<RouteFact>,
    },
    /// 行形状不匹配（表头、空行、端口字段无法解析等）
    Skipped,
}

impl RouteLine {
    pub fn facts(&self) -> &[RouteFact] {
        match self {
            RouteLine::Matched { facts, .. } => facts,
            RouteLine::Skipped => &[],
        }
    }
}

/// 上行/下行节点名字匹配规则
#[derive(Debug, Clone)]
pub struct RoutePatterns {
    upstream: Regex,
    downstream: Option<Regex>,
}

impl RoutePatterns {
    /// 由两个字面量前缀构建规则。
    ///
    /// - 上行：描述中任意位置出现 `<up_prefix><数字>`，节点名取该匹配；
    /// - 下行：描述中出现 `<down_prefix><数字>-ib0`，节点名取 `-ib0` 之前的部分。
    ///
    /// `down_prefix` 为 `None` 时不产生下行事实。
    pub fn new(up_prefix: &str, down_prefix: Option<&str>) -> Result<Self, regex::Error> {
        let upstream = Regex::new(&format!("({}[0-9]+)", regex::escape(up_prefix)))?;
        let downstream = match down_prefix.filter(|p| !p.is_empty()) {
            Some(p) => Some(Regex::new(&format!("({}[0-9]+)-ib0", regex::escape(p)))?),
            None => None,
        };
        Ok(Self {
            upstream,
            downstream,
        })
    }

    /// 对单行分类。
    pub fn classify(&self, line: &str) -> RouteLine {
        let Some(caps) = ROUTE_LINE_RE.captures(line) else {
            return RouteLine::Skipped;
        };
        let Some(port) = parse_number(&caps[1]) else {
            return RouteLine::Skipped;
        };
        let descriptor = &caps[2];

        let mut facts = Vec::new();
        if let Some(m) = self.upstream.captures(descriptor) {
            facts.push(RouteFact {
                port,
                node: m[1].to_string(),
                class: NodeClass::Upstream,
            });
        }
        if let Some(re) = &self.downstream {
            if port <= DOWNLINK_PORT_MAX {
                if let Some(m) = re.captures(descriptor) {
                    facts.push(RouteFact {
                        port,
                        node: m[1].to_string(),
                        class: NodeClass::Downstream,
                    });
                }
            }
        }

        RouteLine::Matched {
            port,
            descriptor: descriptor.to_string(),
            facts,
        }
    }

    /// 按行序惰性产出整段输出中的所有事实。
    pub fn facts<'a>(&'a self, text: &'a str) -> impl Iterator<Item = RouteFact> + 'a {
        text.lines().flat_map(move |line| match self.classify(line) {
            RouteLine::Matched { facts, .. } => facts,
            RouteLine::Skipped => Vec::new(),
        })
    }
}

/// 解析一整段路由表输出，返回按行序排列的事实。
pub fn parse_route_dump(
    text: &str,
    up_prefix: &str,
    down_prefix: Option<&str>,
) -> Result<Vec<RouteFact>, regex::Error> {
    let patterns = RoutePatterns::new(up_prefix, down_prefix)?;
    Ok(patterns.facts(text).collect())
}
