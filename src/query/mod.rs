//! 外部诊断命令
//!
//! fabric 查询协议本身不在本 crate 内实现，只消费外部命令（`ibroute`、
//! `saquery`、`ibswitches`、`ibccquery` 等）输出的文本。

// 子模块声明
mod command;

// 重新导出公共接口
pub use command::ExternalCommand;

/// 按目标查询一段文本输出。
///
/// 返回 `None` 表示调用本身失败（例如无法启动进程）；空输出仍是 `Some("")`。
pub trait FabricQuery: Sync {
    fn query(&self, target: &str) -> Option<String>;
}

impl<F> FabricQuery for F
where
    F: Fn(&str) -> Option<String> + Sync,
{
    fn query(&self, target: &str) -> Option<String> {
        self(target)
    }
}
