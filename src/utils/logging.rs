//! 日志工具模块
//!
//! 提供日志初始化以及批次调度各阶段的格式化输出

use crate::models::{BatchResult, BatchStatus};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先，未设置时使用 `default_level`。重复调用不会报错。
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `total_batches`: 待执行的批次数
/// - `max_parallel`: 最大并行数
pub fn log_startup(total_batches: usize, max_parallel: usize) {
    info!("\n🔄 开始并行执行 {} 个批次", total_batches);
    info!("👥 最大并行任务数: {}", max_parallel);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
pub fn log_batch_start(batch_num: usize, category_count: usize, command_line: &str) {
    info!("\n🚀 开始批次 {}", batch_num);
    info!("📁 分类数: {}", category_count);
    info!("🔧 命令: {}", command_line);
}

/// 记录批次完成信息
pub fn log_batch_complete(result: &BatchResult) {
    match result.status {
        BatchStatus::Success => info!(
            "✅ 批次 {} 成功完成，耗时 {:.1}s",
            result.batch_num, result.elapsed_time
        ),
        BatchStatus::Failure => {
            error!(
                "❌ 批次 {} 失败，退出码 {:?}",
                result.batch_num, result.return_code
            );
            if let Some(stderr) = &result.error {
                error!("错误输出: {}", stderr);
            }
        }
        BatchStatus::Timeout => warn!(
            "⏰ 批次 {} 超时（{:.0}s）",
            result.batch_num, result.elapsed_time
        ),
        BatchStatus::Crashed => error!(
            "💥 批次 {} 崩溃: {}",
            result.batch_num,
            result.error.as_deref().unwrap_or("未知错误")
        ),
    }
}

/// 记录整体进度
pub fn log_progress(completed: usize, total: usize) {
    info!("📊 进度: {}/{} 个批次已完成", completed, total);
}

/// 保留文本末尾 `max_len` 个字符（用于 stderr 尾部）
pub fn tail_text(text: &str, max_len: usize) -> String {
    let text = text.trim_end();
    let count = text.chars().count();
    if count > max_len {
        "...".to_string() + &text.chars().skip(count - max_len).collect::<String>()
    } else {
        text.to_string()
    }
}
