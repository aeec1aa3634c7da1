//! worker 调用参数
//!
//! 把一个批次 + 运行选项转换成一次外部进程调用的参数列表。

use crate::config::Config;
use crate::models::{leading_segment, Batch};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// worker 速度档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpeedProfile {
    Normal,
    #[default]
    Fast,
    Aggressive,
    Turbo,
}

impl SpeedProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            SpeedProfile::Normal => "normal",
            SpeedProfile::Fast => "fast",
            SpeedProfile::Aggressive => "aggressive",
            SpeedProfile::Turbo => "turbo",
        }
    }
}

impl fmt::Display for SpeedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 每次 worker 调用共用的运行选项
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub speed_profile: SpeedProfile,
    /// 单批最多抓取的题目数
    pub max_questions: u32,
    /// 传给 worker 的并发提示
    pub concurrency: usize,
    pub backup: bool,
    /// 单批超时
    pub timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            speed_profile: SpeedProfile::Fast,
            max_questions: 5000,
            concurrency: 6,
            backup: true,
            timeout: Duration::from_secs(3600),
        }
    }
}

/// 一次 worker 调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: String,
    /// 脚本路径（直接调用可执行程序时为空）
    pub script: Option<String>,
    /// 精简后的分类名
    pub categories: Vec<String>,
    pub speed_profile: SpeedProfile,
    pub max_questions: u32,
    pub concurrency: usize,
    pub backup: bool,
}

impl WorkerCommand {
    /// 为批次构建调用参数
    ///
    /// # 返回
    /// (调用参数, 因数量上限被丢弃的分类名)
    pub fn from_batch(batch: &Batch, options: &RunOptions, config: &Config) -> (Self, Vec<String>) {
        let urls = batch.urls();
        let (categories, dropped) = compact_categories(
            &urls,
            &config.category_url_prefix,
            config.max_worker_categories,
        );

        let script = Some(config.worker_script.clone()).filter(|s| !s.is_empty());

        let command = Self {
            program: config.worker_program.clone(),
            script,
            categories,
            speed_profile: options.speed_profile,
            max_questions: options.max_questions,
            concurrency: options.concurrency,
            backup: options.backup,
        };

        (command, dropped)
    }

    /// 进程参数列表（不含程序本身）
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(10);
        if let Some(script) = &self.script {
            args.push(script.clone());
        }
        args.extend([
            "--categories".to_string(),
            self.categories.join(","),
            "--speed-profile".to_string(),
            self.speed_profile.to_string(),
            "--max-questions".to_string(),
            self.max_questions.to_string(),
            "--concurrency".to_string(),
            self.concurrency.to_string(),
        ]);
        if self.backup {
            args.push("--backup".to_string());
        }
        args
    }
}

impl fmt::Display for WorkerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.to_args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// 分类 URL → worker 使用的精简名称
///
/// 取前缀后的首个路径段，去重保序，最多保留 `max` 个。
///
/// # 返回
/// (保留的名称, 超出上限被丢弃的名称)
pub fn compact_categories(urls: &[String], prefix: &str, max: usize) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = urls
        .iter()
        .map(|url| leading_segment(url, prefix))
        .filter(|name| seen.insert(name.clone()))
        .collect();

    let dropped = if unique.len() > max {
        unique.split_off(max)
    } else {
        Vec::new()
    };

    (unique, dropped)
}
