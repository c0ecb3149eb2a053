//! 以子进程方式调用外部命令

use std::process::{Command, Stdio};

use tracing::{trace, warn};

use super::FabricQuery;

/// 外部命令：程序名加固定参数，目标作为最后一个参数追加。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// 运行命令并取回 stdout；stderr 直接透传给用户。
    ///
    /// 退出码非零不算失败，只要进程能启动就返回它的 stdout。
    pub fn run(&self, extra: &[&str]) -> Option<String> {
        trace!(program = %self.program, args = ?self.args, ?extra, "执行外部命令");
        let output = Command::new(&self.program)
            .args(&self.args)
            .args(extra)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output();

        match output {
            Ok(out) => {
                if !out.status.success() {
                    warn!(program = %self.program, ?extra, status = %out.status, "外部命令非零退出");
                }
                Some(String::from_utf8_lossy(&out.stdout).into_owned())
            }
            Err(err) => {
                warn!(program = %self.program, ?extra, %err, "无法启动外部命令");
                None
            }
        }
    }
}

impl FabricQuery for ExternalCommand {
    fn query(&self, target: &str) -> Option<String> {
        self.run(&[target])
    }
}
