//! 并发采集各交换机路由表并构建拓扑

use tracing::{info, warn};

use super::id::SwitchLid;
use super::switch::Switch;
use super::topology::TopologyMap;
use crate::dispatch::Dispatcher;
use crate::parse::RoutePatterns;
use crate::query::FabricQuery;

/// 对每个 LID 调用一次 `query`，在工作线程内解析出 [`Switch`]，
/// 汇总后按 `lids` 的顺序放入拓扑表。
///
/// 查询失败的交换机以空交换机（零端口）出现在结果中。
#[tracing::instrument(skip_all, fields(switches = lids.len()))]
pub fn collect_topology<Q>(
    lids: &[SwitchLid],
    query: &Q,
    patterns: &RoutePatterns,
    dispatcher: &Dispatcher,
) -> TopologyMap
where
    Q: FabricQuery + ?Sized,
{
    let results = dispatcher.run(lids, |lid| {
        let text = query.query(&lid.to_string())?;
        Some(Switch::from_facts(*lid, patterns.facts(&text)))
    });

    let mut topo = TopologyMap::new();
    for (lid, sw) in results.into_ordered() {
        match sw {
            Some(sw) => topo.insert(sw),
            None => {
                warn!(%lid, "路由表查询失败，按零端口处理");
                topo.insert(Switch::new(lid));
            }
        }
    }

    info!(
        switches = topo.len(),
        edge_switches = topo.iter().filter(|sw| sw.is_edge()).count(),
        "拓扑构建完成"
    );
    topo
}
