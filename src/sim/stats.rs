//! 负载统计

use serde::Serialize;

/// 直方图桶值的汇总统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadStats {
    pub buckets: usize,
    pub mean: f64,
    /// 总体标准差
    pub std_dev: f64,
    pub min: u64,
    pub max: u64,
}

impl LoadStats {
    /// 空输入返回 `None`。
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let values: Vec<u64> = values.into_iter().collect();
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;
        let n = values.len() as f64;
        let mean = values.iter().sum::<u64>() as f64 / n;
        let var = values
            .iter()
            .map(|&v| {
                let d = mean - v as f64;
                d * d
            })
            .sum::<f64>()
            / n;

        Some(Self {
            buckets: values.len(),
            mean,
            std_dev: var.sqrt(),
            min,
            max,
        })
    }

    /// 最大值高出均值的百分比
    pub fn max_over_mean_pct(&self) -> f64 {
        if self.mean == 0.0 {
            return 0.0;
        }
        (self.max as f64 - self.mean) / self.mean * 100.0
    }

    /// 标准差占均值的百分比
    pub fn std_dev_pct(&self) -> f64 {
        if self.mean == 0.0 {
            return 0.0;
        }
        self.std_dev / self.mean * 100.0
    }

    /// 观测性能：`mean / max * 100`，最忙的上行越接近平均越高。全零视为 100。
    pub fn observed_performance(&self) -> f64 {
        if self.max == 0 {
            return 100.0;
        }
        self.mean / self.max as f64 * 100.0
    }
}
