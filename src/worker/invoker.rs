//! 批次调用器
//!
//! 一个批次 → 一次 worker 调用 → 一个 `BatchResult`。
//! 失败、超时、崩溃都记录为结果数据，不向上抛错。

use crate::config::Config;
use crate::infrastructure::WorkerLauncher;
use crate::models::{Batch, BatchResult, BatchStatus};
use crate::utils::logging::{log_batch_complete, log_batch_start, tail_text};
use crate::worker::command::{RunOptions, WorkerCommand};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// 超时结果的诊断信息
pub const TIMEOUT_MESSAGE: &str = "timeout";

/// 批次调用器
///
/// 职责：
/// - 构建 worker 调用参数
/// - 施加单批超时
/// - 把进程退出情况映射为批次状态
pub struct WorkerInvoker {
    launcher: Arc<dyn WorkerLauncher>,
    options: RunOptions,
    config: Config,
}

impl WorkerInvoker {
    pub fn new(launcher: Arc<dyn WorkerLauncher>, options: RunOptions, config: Config) -> Self {
        Self {
            launcher,
            options,
            config,
        }
    }

    /// 执行单个批次
    ///
    /// 阻塞当前任务直到 worker 退出、超时被终止或启动失败
    pub async fn run(&self, batch: &Batch) -> BatchResult {
        let (command, dropped) = WorkerCommand::from_batch(batch, &self.options, &self.config);
        if !dropped.is_empty() {
            warn!(
                "⚠️ 批次 {} 的分类数超过单次调用上限 {}，以下分类不会传给 worker: {}",
                batch.number,
                self.config.max_worker_categories,
                dropped.join(",")
            );
        }

        log_batch_start(batch.number, batch.len(), &command.to_string());

        let start = Instant::now();
        let outcome = tokio::time::timeout(self.options.timeout, self.launcher.launch(&command)).await;
        let elapsed = start.elapsed().as_secs_f64();

        let mut result = match outcome {
            Err(_) => BatchResult {
                error: Some(TIMEOUT_MESSAGE.to_string()),
                ..BatchResult::new(batch, BatchStatus::Timeout, self.options.timeout.as_secs_f64())
            },
            Ok(Err(e)) => BatchResult::crashed(batch, elapsed, e.to_string()),
            Ok(Ok(exit)) => {
                let status = if exit.success() {
                    BatchStatus::Success
                } else {
                    BatchStatus::Failure
                };
                let error = (status == BatchStatus::Failure)
                    .then(|| tail_text(&exit.stderr, self.config.stderr_tail_chars));
                BatchResult {
                    error,
                    return_code: exit.code,
                    stdout_lines: exit.stdout.lines().count(),
                    stderr_lines: exit.stderr.lines().count(),
                    ..BatchResult::new(batch, status, elapsed)
                }
            }
        };
        result.dropped_categories = dropped;

        log_batch_complete(&result);
        result
    }
}
