//! 规划层（Planning）
//!
//! 把分类目录变成有序的批次列表：
//!
//! ```text
//! CategoryCatalog
//!     ↓ PriorityTable（优先关键词）
//! BatchPlanner::plan（sequential / priority / balanced）
//!     ↓
//! resume（可选，从第 k 批开始）
//!     ↓
//! Vec<Batch>
//! ```

pub mod analysis;
pub mod batch_planner;
pub mod priority;

pub use analysis::{log_analysis, CategoryAnalysis};
pub use batch_planner::{resume, BatchPlanner, Strategy};
pub use priority::{PriorityKeyword, PriorityTable};
