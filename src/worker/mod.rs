//! worker 调用层
//!
//! - `command` - 批次 + 选项 → 进程参数
//! - `invoker` - 执行一次调用并生成 `BatchResult`

pub mod command;
pub mod invoker;

pub use command::{compact_categories, RunOptions, SpeedProfile, WorkerCommand};
pub use invoker::{WorkerInvoker, TIMEOUT_MESSAGE};
