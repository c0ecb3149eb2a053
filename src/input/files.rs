use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn read(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// 每行一个名字，去掉首尾空白，跳过空行。
pub fn parse_node_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_node_list(path: impl AsRef<Path>) -> Result<Vec<String>, InputError> {
    Ok(parse_node_list(&read(path.as_ref())?))
}

/// `A, B` 配对文件的反查表：B → A。
///
/// 以最后一个 `", "` 切分；同一个 B 出现多次时后者覆盖前者。
#[derive(Debug, Clone, Default)]
pub struct PairMap {
    reverse: HashMap<String, String>,
}

impl PairMap {
    pub fn parse(text: &str) -> Self {
        let reverse = text
            .lines()
            .filter_map(|line| line.trim_end().rsplit_once(", "))
            .map(|(a, b)| (b.to_string(), a.to_string()))
            .collect();
        Self { reverse }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, InputError> {
        Ok(Self::parse(&read(path.as_ref())?))
    }

    pub fn reverse_lookup(&self, b: &str) -> Option<&str> {
        self.reverse.get(b).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }
}
