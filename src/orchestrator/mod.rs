//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批次调度和结果汇总，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 一次完整运行
//! - 加载分类、分析、规划批次、续跑
//! - 调用 scheduler 并汇总结果
//!
//! ### `scheduler` - 并行调度
//! - 固定数量的并行槽位（Semaphore）
//! - 按完成顺序收集结果，实时输出进度
//! - 单个批次的失败互不影响
//!
//! ### `reporter` - 统计与持久化
//! - 计算成功/失败数、总耗时、平均耗时
//! - 保存/读取结果文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Category>)
//!     ↓
//! planner (Vec<Category> → Vec<Batch>)
//!     ↓
//! scheduler (并行执行 Vec<Batch>)
//!     ↓
//! worker::WorkerInvoker (处理单个 Batch)
//!     ↓
//! infrastructure (ProcessLauncher)
//! ```

pub mod batch_processor;
pub mod reporter;
pub mod scheduler;

// 重新导出主要类型
pub use batch_processor::{App, RunOutcome, RunRequest};
pub use reporter::{
    failed_batch_numbers, inspect_results, load_results, persist_results, prepare_results_dir,
    summarize, RunSummary,
};
pub use scheduler::run_all;
