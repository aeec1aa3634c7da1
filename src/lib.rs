//! # Batch Scraper
//!
//! 按分类批量调度抓取 worker 的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部进程，只暴露"启动 worker"能力
//! - `ProcessLauncher` - 基于 tokio::process，超时丢弃时终止进程
//!
//! ### ② 数据层（Models）
//! - `models/` - 分类目录、批次、批次结果
//! - `loaders` - 读取分类 JSON
//!
//! ### ③ 规划层（Planner）
//! - `planner/` - 优先关键词表、批次策略、续跑
//!
//! ### ④ 调用层（Worker）
//! - `worker/` - 调用参数构建，单批次执行与状态映射
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/scheduler` - 有界并行调度
//! - `orchestrator/reporter` - 统计与结果文件
//! - `orchestrator/batch_processor` - 一次完整运行
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod planner;
pub mod utils;
pub mod worker;

// 重新导出常用类型
pub use cli::Cli;
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError};
pub use infrastructure::{ProcessLauncher, WorkerExit, WorkerLauncher};
pub use models::{Batch, BatchResult, BatchStatus, Category, CategoryCatalog};
pub use orchestrator::{App, RunOutcome, RunRequest, RunSummary};
pub use planner::{BatchPlanner, PriorityTable, Strategy};
pub use worker::{RunOptions, SpeedProfile, WorkerCommand, WorkerInvoker};
