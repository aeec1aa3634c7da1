//! 进程启动器 - 基础设施层
//!
//! 只暴露"运行一次 worker 进程"的能力，不关心批次和结果分类

use crate::worker::WorkerCommand;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// worker 进程的退出信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerExit {
    /// 退出码（被信号终止时为空）
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl WorkerExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// worker 启动能力
///
/// 调用会一直等到 worker 退出。返回的 future 被丢弃时，
/// 实现必须终止对应的进程（超时依赖这一点）。
#[async_trait]
pub trait WorkerLauncher: Send + Sync {
    async fn launch(&self, command: &WorkerCommand) -> std::io::Result<WorkerExit>;
}

/// 基于 `tokio::process` 的启动器
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkerLauncher for ProcessLauncher {
    async fn launch(&self, command: &WorkerCommand) -> std::io::Result<WorkerExit> {
        let output = Command::new(&command.program)
            .args(command.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(WorkerExit {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
