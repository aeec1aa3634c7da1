use crate::models::category::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一个批次：交给一次 worker 调用的一组分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 批次编号（从1开始，续跑时保持不变）
    pub number: usize,
    pub categories: Vec<Category>,
}

impl Batch {
    pub fn new(number: usize, categories: Vec<Category>) -> Self {
        Self { number, categories }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn urls(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.url.clone()).collect()
    }
}

/// 批次执行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// worker 正常退出（退出码 0）
    Success,
    /// worker 以非零退出码退出
    Failure,
    /// 超时被终止
    Timeout,
    /// 调用本身出错（如程序不存在）
    Crashed,
}

impl BatchStatus {
    pub fn is_success(self) -> bool {
        self == BatchStatus::Success
    }

    pub fn icon(self) -> &'static str {
        match self {
            BatchStatus::Success => "✅",
            BatchStatus::Failure => "❌",
            BatchStatus::Timeout => "⏰",
            BatchStatus::Crashed => "💥",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchStatus::Success => "success",
            BatchStatus::Failure => "failure",
            BatchStatus::Timeout => "timeout",
            BatchStatus::Crashed => "crashed",
        };
        write!(f, "{}", name)
    }
}

/// 单个批次的执行结果
///
/// 每个批次只生成一次，生成后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_num: usize,
    /// 本批覆盖的分类 URL
    pub categories: Vec<String>,
    /// 耗时（秒）
    pub elapsed_time: f64,
    pub status: BatchStatus,
    /// 诊断信息：stderr 尾部或异常消息
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// worker 退出码（超时/崩溃时为空）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,
    #[serde(default)]
    pub stdout_lines: usize,
    #[serde(default)]
    pub stderr_lines: usize,
    /// 因单次调用分类数上限被丢弃的分类名
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_categories: Vec<String>,
}

impl BatchResult {
    /// 只包含编号/分类/状态的结果，其余字段为默认值
    pub fn new(batch: &Batch, status: BatchStatus, elapsed_time: f64) -> Self {
        Self {
            batch_num: batch.number,
            categories: batch.urls(),
            elapsed_time,
            status,
            error: None,
            return_code: None,
            stdout_lines: 0,
            stderr_lines: 0,
            dropped_categories: Vec::new(),
        }
    }

    pub fn crashed(batch: &Batch, elapsed_time: f64, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(batch, BatchStatus::Crashed, elapsed_time)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
