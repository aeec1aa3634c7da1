//! 批次调度器 - 编排层
//!
//! ## 调度模型
//!
//! - 所有批次一次性提交，每个批次一个 `tokio::spawn` 任务
//! - `Semaphore` 限制同时运行的 worker 数量（`max_parallel`）
//! - 结果通过 mpsc 通道按完成顺序回传，只由调度方持有结果列表
//! - 单个批次失败/超时/崩溃不影响其他批次

use crate::error::ConfigError;
use crate::models::{Batch, BatchResult};
use crate::utils::logging::{log_progress, log_startup};
use crate::worker::WorkerInvoker;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tracing::error;

/// 并行执行所有批次
///
/// # 参数
/// - `invoker`: 批次调用器（携带运行选项）
/// - `batches`: 待执行批次
/// - `max_parallel`: 最大并行数，必须 >= 1
///
/// # 返回
/// 按完成顺序排列的结果，每个批次恰好一条
pub async fn run_all(
    invoker: Arc<WorkerInvoker>,
    batches: Vec<Batch>,
    max_parallel: usize,
) -> Result<Vec<BatchResult>, ConfigError> {
    if max_parallel == 0 {
        return Err(ConfigError::InvalidParallelism(max_parallel));
    }

    let total = batches.len();
    log_startup(total, max_parallel);

    let semaphore = Arc::new(Semaphore::new(max_parallel));
    let (tx, mut rx) = mpsc::unbounded_channel::<BatchResult>();
    let mut handles = Vec::with_capacity(total);

    for batch in batches {
        let semaphore = semaphore.clone();
        let invoker = invoker.clone();
        let tx = tx.clone();
        let task_batch = batch.clone();

        let handle = tokio::spawn(async move {
            let batch = task_batch;
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let _ = tx.send(BatchResult::crashed(&batch, 0.0, e.to_string()));
                    return;
                }
            };

            let start = Instant::now();
            let result = match AssertUnwindSafe(invoker.run(&batch)).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!("💥 批次 {} 执行时发生异常: {}", batch.number, message);
                    BatchResult::crashed(&batch, start.elapsed().as_secs_f64(), message)
                }
            };
            let _ = tx.send(result);
        });
        handles.push((batch, handle));
    }
    drop(tx);

    // 按完成顺序收集结果
    let mut results = Vec::with_capacity(total);
    while let Some(result) = rx.recv().await {
        results.push(result);
        log_progress(results.len(), total);
    }

    // 没有送回结果的任务（被取消等）也要记录下来
    let reported: HashSet<usize> = results.iter().map(|r| r.batch_num).collect();
    for (batch, handle) in handles {
        let join_error = handle.await.err();
        if reported.contains(&batch.number) {
            continue;
        }
        let message = join_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "批次任务未返回结果".to_string());
        error!("💥 批次 {} 任务执行失败: {}", batch.number, message);
        results.push(BatchResult::crashed(&batch, 0.0, message));
        log_progress(results.len(), total);
    }

    Ok(results)
}

/// 提取 panic 携带的消息
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "未知异常".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::infrastructure::{WorkerExit, WorkerLauncher};
    use crate::models::{BatchStatus, Category};
    use crate::worker::{RunOptions, WorkerCommand};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// 记录并发峰值的假 worker
    #[derive(Default)]
    struct CountingWorker {
        in_flight: AtomicUsize,
        high_water: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WorkerLauncher for CountingWorker {
        async fn launch(&self, _command: &WorkerCommand) -> std::io::Result<WorkerExit> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(WorkerExit {
                code: Some(0),
                ..WorkerExit::default()
            })
        }
    }

    /// 按分类名决定行为：slow 超时、fail 失败、panic 直接 panic
    struct ScriptedWorker;

    #[async_trait]
    impl WorkerLauncher for ScriptedWorker {
        async fn launch(&self, command: &WorkerCommand) -> std::io::Result<WorkerExit> {
            let name = command.categories.first().cloned().unwrap_or_default();
            match name.as_str() {
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(WorkerExit::default())
                }
                "fail" => Ok(WorkerExit {
                    code: Some(1),
                    stderr: "scrape error".to_string(),
                    ..WorkerExit::default()
                }),
                "panic" => panic!("worker exploded"),
                _ => Ok(WorkerExit {
                    code: Some(0),
                    ..WorkerExit::default()
                }),
            }
        }
    }

    fn batches(names: &[&str]) -> Vec<Batch> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Batch::new(
                    i + 1,
                    vec![Category::new(format!(
                        "https://www.funtrivia.com/quizzes/{}/c.html",
                        name
                    ))],
                )
            })
            .collect()
    }

    fn invoker(launcher: Arc<dyn WorkerLauncher>, timeout: Duration) -> Arc<WorkerInvoker> {
        let options = RunOptions {
            timeout,
            ..RunOptions::default()
        };
        Arc::new(WorkerInvoker::new(launcher, options, Config::default()))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bound() {
        let worker = Arc::new(CountingWorker::default());
        let names: Vec<String> = (0..12).map(|i| format!("d{}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();

        let results = run_all(
            invoker(worker.clone(), Duration::from_secs(5)),
            batches(&names),
            3,
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 12);
        assert_eq!(worker.calls.load(Ordering::SeqCst), 12);
        let high_water = worker.high_water.load(Ordering::SeqCst);
        assert!(high_water <= 3, "并发峰值 {} 超过上限", high_water);
        assert!(high_water >= 2);
    }

    #[tokio::test]
    async fn test_timeout_isolation() {
        let results = run_all(
            invoker(Arc::new(ScriptedWorker), Duration::from_millis(100)),
            batches(&["fast1", "slow", "fast2", "fast3"]),
            2,
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 4);
        for result in &results {
            if result.batch_num == 2 {
                assert_eq!(result.status, BatchStatus::Timeout);
            } else {
                assert_eq!(result.status, BatchStatus::Success);
            }
        }
    }

    #[tokio::test]
    async fn test_failures_are_recorded_not_raised() {
        let results = run_all(
            invoker(Arc::new(ScriptedWorker), Duration::from_secs(5)),
            batches(&["ok", "fail", "panic", "ok2"]),
            4,
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 4);
        let by_num = |n: usize| results.iter().find(|r| r.batch_num == n).unwrap();
        assert_eq!(by_num(1).status, BatchStatus::Success);
        assert_eq!(by_num(2).status, BatchStatus::Failure);
        assert_eq!(by_num(2).error.as_deref(), Some("scrape error"));
        assert_eq!(by_num(3).status, BatchStatus::Crashed);
        assert_eq!(by_num(3).error.as_deref(), Some("worker exploded"));
        assert_eq!(by_num(4).status, BatchStatus::Success);
    }

    #[tokio::test]
    async fn test_zero_parallelism_rejected() {
        let err = run_all(
            invoker(Arc::new(ScriptedWorker), Duration::from_secs(1)),
            batches(&["a"]),
            0,
        )
        .await
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidParallelism(0));
    }

    #[tokio::test]
    async fn test_empty_batches() {
        let results = run_all(
            invoker(Arc::new(ScriptedWorker), Duration::from_secs(1)),
            Vec::new(),
            2,
        )
        .await
        .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(boxed.as_ref()), "未知异常");
    }
}
