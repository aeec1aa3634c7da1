//! 批量抓取处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，串起一次完整的运行。
//!
//! ## 核心功能
//!
//! 1. **加载分类**：读取分类文件，空目录直接失败
//! 2. **分析**：打印领域分布和优先分类（`--analyze-only` 到此为止）
//! 3. **规划**：按策略生成批次，可从指定批次续跑
//! 4. **调度**：交给 scheduler 并行执行
//! 5. **汇总**：输出统计并保存结果文件
//!
//! 只有配置类错误会中止运行；批次失败只体现在统计里，
//! 结果文件保存失败也只记录错误日志。

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{ProcessLauncher, WorkerLauncher};
use crate::models::{load_catalog, BatchResult};
use crate::orchestrator::reporter::{self, RunSummary};
use crate::orchestrator::scheduler;
use crate::planner::{self, BatchPlanner, CategoryAnalysis, Strategy};
use crate::worker::{RunOptions, WorkerInvoker};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// 单次运行的参数
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub categories_file: PathBuf,
    pub batch_size: usize,
    pub parallel_jobs: usize,
    pub strategy: Strategy,
    pub resume_from_batch: Option<usize>,
    pub analyze_only: bool,
    pub options: RunOptions,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            categories_file: PathBuf::from("output/all_categories.json"),
            batch_size: 6,
            parallel_jobs: 4,
            strategy: Strategy::Balanced,
            resume_from_batch: None,
            analyze_only: false,
            options: RunOptions::default(),
        }
    }
}

/// 运行结果
#[derive(Debug)]
pub enum RunOutcome {
    /// 只做了分析
    Analyzed(CategoryAnalysis),
    /// 批次已全部执行
    Completed {
        results: Vec<BatchResult>,
        summary: RunSummary,
        /// 结果文件路径，保存失败时为 `None`
        artifact: Option<PathBuf>,
    },
}

/// 应用主结构
pub struct App {
    config: Config,
    launcher: Arc<dyn WorkerLauncher>,
}

impl App {
    /// 使用真实进程启动器
    pub fn new(config: Config) -> Self {
        Self::with_launcher(config, Arc::new(ProcessLauncher::new()))
    }

    pub fn with_launcher(config: Config, launcher: Arc<dyn WorkerLauncher>) -> Self {
        Self { config, launcher }
    }

    /// 运行应用主逻辑
    pub async fn run(&self, request: RunRequest) -> AppResult<RunOutcome> {
        self.config.validate()?;

        // 加载分类
        let catalog = load_catalog(&request.categories_file, &self.config.category_url_prefix).await?;
        let planner = BatchPlanner::new(self.config.priority_table());

        // 分析
        let analysis = CategoryAnalysis::new(&catalog, planner.table());
        planner::log_analysis(&analysis);

        if request.analyze_only {
            return Ok(RunOutcome::Analyzed(analysis));
        }

        // 规划批次
        info!("\n🔨 使用策略创建批次: {}", request.strategy);
        let mut batches = planner.plan(&catalog.categories, request.batch_size, request.strategy)?;

        if let Some(from_batch) = request.resume_from_batch {
            batches = planner::resume(batches, from_batch)?;
            info!("📍 从第 {} 批开始续跑", from_batch);
        }

        info!(
            "📦 共 {} 个批次，每批约 {} 个分类",
            batches.len(),
            request.batch_size
        );

        reporter::prepare_results_dir(&self.config.results_dir)?;

        // 并行执行
        let invoker = Arc::new(WorkerInvoker::new(
            self.launcher.clone(),
            request.options.clone(),
            self.config.clone(),
        ));
        let results = scheduler::run_all(invoker, batches, request.parallel_jobs).await?;

        // 汇总与保存
        let summary = reporter::summarize(&results);
        reporter::print_final_stats(&summary);

        let artifact = match reporter::persist_results(&results, &self.config.results_dir) {
            Ok(path) => {
                info!("\n💾 详细结果已保存至: {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("❌ 保存结果文件失败: {}", e);
                None
            }
        };

        Ok(RunOutcome::Completed {
            results,
            summary,
            artifact,
        })
    }
}
