//! 标识符类型

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FabricError;
use crate::parse::parse_number;

/// 交换机 LID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SwitchLid(pub u32);

impl fmt::Display for SwitchLid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SwitchLid {
    type Err = FabricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_number(s)
            .map(SwitchLid)
            .ok_or_else(|| FabricError::InvalidLid(s.to_string()))
    }
}

/// 解析逗号分隔的 LID 列表（`220,55,0x1a`），忽略空项。
pub fn parse_lid_list(s: &str) -> Result<Vec<SwitchLid>, FabricError> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}
