//! 运行配置
//!
//! 可选的 JSON 配置文件，命令行参数覆盖文件中的同名字段。合并后缺少必需字段
//! 视为启动错误，在任何分发开始之前报告。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assign::{AssignOpts, DEFAULT_CAPACITY, DEFAULT_THRESHOLD_DIVISOR};
use crate::dispatch::{Dispatcher, Progress, default_concurrency};
use crate::fabric::SwitchLid;
use crate::parse::RoutePatterns;
use crate::query::ExternalCommand;
use crate::sim::NodePools;

pub const DEFAULT_UPSTREAM_POOL: usize = 768;
pub const DEFAULT_COMPUTE_NODES: usize = 768;
pub const DEFAULT_STORAGE_NODES: usize = 768;
pub const DEFAULT_ROUTE_COMMAND: &str = "ibroute";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Must specify {0}")]
    Missing(&'static str),

    #[error("{0} must be at least 1")]
    Zero(&'static str),

    #[error("invalid node name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FabricConfig {
    /// 上行（存储类）节点名前缀，如 `grove`
    pub cluster: Option<String>,
    /// 下行（计算类）节点名前缀，如 `seqio`
    pub downlink_cluster: Option<String>,
    pub lids: Option<Vec<SwitchLid>>,
    pub threads: Option<usize>,
    pub capacity: Option<u32>,
    pub threshold_divisor: Option<usize>,
    pub upstream_pool: Option<usize>,
    pub files: Option<usize>,
    pub compute_nodes: Option<usize>,
    pub storage_nodes: Option<usize>,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub route_command: Option<String>,
}

impl FabricConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `overrides` 中已设置的字段覆盖 `self`。
    pub fn merge(self, overrides: FabricConfig) -> FabricConfig {
        FabricConfig {
            cluster: overrides.cluster.or(self.cluster),
            downlink_cluster: overrides.downlink_cluster.or(self.downlink_cluster),
            lids: overrides.lids.or(self.lids),
            threads: overrides.threads.or(self.threads),
            capacity: overrides.capacity.or(self.capacity),
            threshold_divisor: overrides.threshold_divisor.or(self.threshold_divisor),
            upstream_pool: overrides.upstream_pool.or(self.upstream_pool),
            files: overrides.files.or(self.files),
            compute_nodes: overrides.compute_nodes.or(self.compute_nodes),
            storage_nodes: overrides.storage_nodes.or(self.storage_nodes),
            iterations: overrides.iterations.or(self.iterations),
            seed: overrides.seed.or(self.seed),
            route_command: overrides.route_command.or(self.route_command),
        }
    }

    pub fn cluster(&self) -> Result<&str, ConfigError> {
        non_empty(self.cluster.as_deref()).ok_or(ConfigError::Missing("cluster"))
    }

    pub fn downlink_cluster(&self) -> Option<&str> {
        non_empty(self.downlink_cluster.as_deref())
    }

    pub fn require_downlink_cluster(&self) -> Result<&str, ConfigError> {
        self.downlink_cluster()
            .ok_or(ConfigError::Missing("downlink cluster"))
    }

    pub fn lids(&self) -> Result<&[SwitchLid], ConfigError> {
        match self.lids.as_deref() {
            Some(lids) if !lids.is_empty() => Ok(lids),
            _ => Err(ConfigError::Missing("a lid list")),
        }
    }

    pub fn threads(&self) -> Result<usize, ConfigError> {
        match self.threads {
            Some(0) => Err(ConfigError::Zero("threads")),
            Some(n) => Ok(n),
            None => Ok(default_concurrency()),
        }
    }

    /// 分发器；`progress` 为真时在 stderr 输出每个 LID
    pub fn dispatcher(&self, progress: bool) -> Result<Dispatcher, ConfigError> {
        let dispatcher = Dispatcher::new(self.threads()?);
        Ok(if progress {
            dispatcher.with_progress(Progress::stderr("dump routes for switch lid"))
        } else {
            dispatcher
        })
    }

    pub fn route_patterns(&self) -> Result<RoutePatterns, ConfigError> {
        Ok(RoutePatterns::new(self.cluster()?, self.downlink_cluster())?)
    }

    pub fn route_query(&self) -> ExternalCommand {
        ExternalCommand::new(self.route_command())
    }

    pub fn assign_opts(&self) -> Result<AssignOpts, ConfigError> {
        let threshold_divisor = self.threshold_divisor.unwrap_or(DEFAULT_THRESHOLD_DIVISOR);
        if threshold_divisor == 0 {
            return Err(ConfigError::Zero("threshold divisor"));
        }
        Ok(AssignOpts {
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            threshold_divisor,
        })
    }

    pub fn upstream_pool(&self) -> usize {
        self.upstream_pool.unwrap_or(DEFAULT_UPSTREAM_POOL)
    }

    pub fn node_pools(&self) -> Result<NodePools, ConfigError> {
        let compute = self.compute_nodes.unwrap_or(DEFAULT_COMPUTE_NODES);
        let storage = self.storage_nodes.unwrap_or(DEFAULT_STORAGE_NODES);
        if compute == 0 {
            return Err(ConfigError::Zero("compute nodes"));
        }
        if storage == 0 {
            return Err(ConfigError::Zero("storage nodes"));
        }
        Ok(NodePools {
            compute_prefix: self.require_downlink_cluster()?.to_string(),
            compute,
            storage_prefix: self.cluster()?.to_string(),
            storage,
        })
    }

    /// 文件数，默认与计算节点数相同
    pub fn files(&self) -> usize {
        self.files
            .unwrap_or_else(|| self.compute_nodes.unwrap_or(DEFAULT_COMPUTE_NODES))
    }

    pub fn iterations(&self) -> usize {
        self.iterations.unwrap_or(1)
    }

    pub fn route_command(&self) -> &str {
        self.route_command.as_deref().unwrap_or(DEFAULT_ROUTE_COMMAND)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
