//! 运行结果汇总与持久化

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::BatchResult;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// 运行统计
///
/// 由结果集合计算得出，不单独存储
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub successful: usize,
    /// 非 success 的批次数（失败/超时/崩溃）
    pub failed: usize,
    pub total: usize,
    /// 各批次耗时之和（批次并行执行，不等于实际墙钟时间）
    pub total_elapsed_secs: f64,
    pub average_elapsed_secs: f64,
}

/// 汇总所有批次结果
pub fn summarize(results: &[BatchResult]) -> RunSummary {
    let total = results.len();
    let successful = results.iter().filter(|r| r.is_success()).count();
    let total_elapsed_secs: f64 = results.iter().map(|r| r.elapsed_time).sum();
    let average_elapsed_secs = if total == 0 {
        0.0
    } else {
        total_elapsed_secs / total as f64
    };

    RunSummary {
        successful,
        failed: total - successful,
        total,
        total_elapsed_secs,
        average_elapsed_secs,
    }
}

/// 未成功的批次号（升序）
pub fn failed_batch_numbers(results: &[BatchResult]) -> Vec<usize> {
    let mut numbers: Vec<usize> = results
        .iter()
        .filter(|r| !r.is_success())
        .map(|r| r.batch_num)
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 批次处理统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功批次: {}/{}", summary.successful, summary.total);
    info!("❌ 失败批次: {}", summary.failed);
    info!("⏱️  总处理时间: {:.1}s", summary.total_elapsed_secs);
    info!("⚡ 平均每批: {:.1}s", summary.average_elapsed_secs);
    info!("{}", "=".repeat(60));
}

/// 派发前准备结果目录
///
/// 目录不存在时创建；无法创建或路径不是目录时返回配置错误。
pub fn prepare_results_dir(dir: &Path) -> Result<(), ConfigError> {
    let unavailable = |reason: String| ConfigError::ResultsDirUnavailable {
        path: dir.to_path_buf(),
        reason,
    };

    std::fs::create_dir_all(dir).map_err(|e| unavailable(e.to_string()))?;
    if !dir.is_dir() {
        return Err(unavailable("不是目录".to_string()));
    }
    Ok(())
}

/// 保存完整结果列表
///
/// 文件名为 `batch_results_<unix时间戳>.json`，重名时追加序号。
///
/// # 返回
/// 写入的文件路径
pub fn persist_results(results: &[BatchResult], dir: &Path) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| AppError::io(dir, e))?;

    let json = serde_json::to_string_pretty(results)?;
    let (path, mut file) = create_artifact(dir, chrono::Utc::now().timestamp())?;
    file.write_all(json.as_bytes()).map_err(|e| AppError::io(&path, e))?;

    Ok(path)
}

/// 以 `create_new` 占用一个未使用的文件名
fn create_artifact(dir: &Path, timestamp: i64) -> AppResult<(PathBuf, File)> {
    let mut suffix = 0;
    loop {
        let name = if suffix == 0 {
            format!("batch_results_{}.json", timestamp)
        } else {
            format!("batch_results_{}_{}.json", timestamp, suffix)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(AppError::io(&path, e)),
        }
    }
}

/// 读取之前保存的结果文件
pub fn load_results(path: &Path) -> AppResult<Vec<BatchResult>> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// 检查之前的结果文件：打印统计和建议的续跑批次
///
/// # 返回
/// (统计, 未成功的批次号)
pub fn inspect_results(path: &Path) -> AppResult<(RunSummary, Vec<usize>)> {
    let results = load_results(path)?;
    let summary = summarize(&results);
    let failed = failed_batch_numbers(&results);

    info!("🔍 结果文件: {}", path.display());
    print_final_stats(&summary);
    match failed.first() {
        Some(first) => {
            let listed: Vec<String> = failed.iter().map(|n| n.to_string()).collect();
            info!("❌ 未成功的批次: {}", listed.join(", "));
            info!("💡 可使用 --resume-from-batch {} 续跑", first);
        }
        None => info!("✅ 所有批次均已成功"),
    }

    Ok((summary, failed))
}
