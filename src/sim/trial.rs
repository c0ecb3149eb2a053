//! 单次仿真试验

use std::collections::BTreeMap;
use std::fmt::Write;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info};

use super::stats::LoadStats;
use crate::fabric::{FabricError, PortNum, Switch, SwitchLid, TopologyMap};

/// 计算/存储节点池：节点名为 `<prefix>1..=<prefix>N`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodePools {
    pub compute_prefix: String,
    pub compute: usize,
    pub storage_prefix: String,
    pub storage: usize,
}

impl NodePools {
    pub fn compute_name(&self, idx: usize) -> String {
        format!("{}{}", self.compute_prefix, idx + 1)
    }

    pub fn storage_name(&self, idx: usize) -> String {
        format!("{}{}", self.storage_prefix, idx + 1)
    }
}

#[derive(Debug, Clone)]
pub struct SimOpts {
    pub files: usize,
    pub pools: NodePools,
    /// 固定种子以便复现；`None` 时取系统熵
    pub seed: Option<u64>,
}

/// 直方图中的一个桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub lid: SwitchLid,
    pub port: PortNum,
    pub count: u64,
}

/// 一次试验的结果：只包含至少有一个文件经过的 (交换机, 端口)
#[derive(Debug, Clone, Serialize)]
pub struct SimulationTrial {
    pub files: usize,
    /// 按 (lid, port) 升序
    pub buckets: Vec<Bucket>,
    pub stats: Option<LoadStats>,
}

impl SimulationTrial {
    pub fn count(&self, lid: SwitchLid, port: PortNum) -> u64 {
        self.buckets
            .iter()
            .find(|b| b.lid == lid && b.port == port)
            .map_or(0, |b| b.count)
    }

    /// 文本报告
    pub fn render(&self, pools: &NodePools) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Number of compute nodes : {}", pools.compute);
        let _ = writeln!(out, "Number of storage nodes : {}", pools.storage);
        let _ = writeln!(out, "Number of files: {}", self.files);
        let _ = writeln!(out);
        let Some(stats) = &self.stats else {
            let _ = writeln!(out, "No files simulated");
            return out;
        };
        let _ = writeln!(out, "Files per uplink");
        let _ = writeln!(out, "   Mean    = {:.2}", stats.mean);
        let _ = writeln!(out, "   Minimum = {}", stats.min);
        let _ = writeln!(
            out,
            "   Maximum = {} ({:.2}% over mean)",
            stats.max,
            stats.max_over_mean_pct()
        );
        let _ = writeln!(
            out,
            "   Std Dev = {:.2} ({:.2}%)",
            stats.std_dev,
            stats.std_dev_pct()
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Observed Performance: {:.2}% (or worse)",
            stats.observed_performance()
        );
        out
    }
}

/// 可重复运行的仿真：拓扑相关的查找只做一次，每次试验重新置换。
#[derive(Debug)]
pub struct Simulation<'a> {
    opts: SimOpts,
    /// 计算节点下标 → 所在交换机
    owners: Vec<Option<&'a Switch>>,
    storage_names: Vec<String>,
    rng: StdRng,
}

impl<'a> Simulation<'a> {
    pub fn new(topology: &'a TopologyMap, opts: SimOpts) -> Result<Self, FabricError> {
        if opts.pools.compute == 0 {
            return Err(FabricError::EmptyNodePool("compute"));
        }
        if opts.pools.storage == 0 {
            return Err(FabricError::EmptyNodePool("storage"));
        }

        let owners: Vec<_> = (0..opts.pools.compute)
            .map(|i| topology.downlink_owner(&opts.pools.compute_name(i)))
            .collect();
        let storage_names = (0..opts.pools.storage)
            .map(|i| opts.pools.storage_name(i))
            .collect();
        debug!(
            compute = opts.pools.compute,
            owned = owners.iter().filter(|o| o.is_some()).count(),
            "计算节点归属解析完成"
        );

        let rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            opts,
            owners,
            storage_names,
            rng,
        })
    }

    pub fn opts(&self) -> &SimOpts {
        &self.opts
    }

    #[tracing::instrument(skip(self), fields(files = self.opts.files))]
    pub fn run_trial(&mut self) -> Result<SimulationTrial, FabricError> {
        let files = self.opts.files;
        let compute = self.opts.pools.compute;
        let storage = self.opts.pools.storage;

        let mut file_to_compute: Vec<usize> = (0..files).map(|f| f % compute).collect();
        file_to_compute.shuffle(&mut self.rng);

        let mut histogram: BTreeMap<(SwitchLid, PortNum), u64> = BTreeMap::new();
        for (file, &ci) in file_to_compute.iter().enumerate() {
            let sw = self.owners[ci]
                .ok_or_else(|| FabricError::UnknownDownstream(self.opts.pools.compute_name(ci)))?;
            let port = sw.get_uplink_port(&self.storage_names[file % storage])?;
            *histogram.entry((sw.lid(), port)).or_default() += 1;
        }

        let buckets: Vec<Bucket> = histogram
            .into_iter()
            .map(|((lid, port), count)| Bucket { lid, port, count })
            .collect();
        let stats = LoadStats::from_values(buckets.iter().map(|b| b.count));
        if let Some(s) = &stats {
            info!(
                buckets = s.buckets,
                mean = s.mean,
                max = s.max,
                observed = s.observed_performance(),
                "试验完成"
            );
        }

        Ok(SimulationTrial {
            files,
            buckets,
            stats,
        })
    }
}

/// 用系统熵做一次独立试验。
pub fn run_simulation_trial(
    topology: &TopologyMap,
    files: usize,
    pools: &NodePools,
) -> Result<SimulationTrial, FabricError> {
    Simulation::new(
        topology,
        SimOpts {
            files,
            pools: pools.clone(),
            seed: None,
        },
    )?
    .run_trial()
}
