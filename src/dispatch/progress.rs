//! 进度输出
//!
//! 每认领一个目标就在 stderr 上打印 `<id>, `。多个工作线程的输出交错，
//! 顺序不做任何保证。

use std::fmt::Display;
use std::io::Write;

/// 进度输出方式
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Progress {
    /// 不输出
    #[default]
    Silent,
    /// 输出到 stderr，先打印一行前缀 `label: `
    Stderr { label: String },
}

impl Progress {
    pub fn stderr(label: impl Into<String>) -> Self {
        Progress::Stderr {
            label: label.into(),
        }
    }

    pub(crate) fn begin(&self) {
        if let Progress::Stderr { label } = self {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "{label}: ");
            let _ = err.flush();
        }
    }

    pub(crate) fn claim<T: Display>(&self, target: &T) {
        if let Progress::Stderr { .. } = self {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "{target}, ");
            let _ = err.flush();
        }
    }

    pub(crate) fn finish(&self) {
        if let Progress::Stderr { .. } = self {
            let _ = writeln!(std::io::stderr());
        }
    }
}
