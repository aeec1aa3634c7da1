use crate::orchestrator::RunRequest;
use crate::planner::Strategy;
use crate::worker::{RunOptions, SpeedProfile};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// FunTrivia 分类批量抓取调度器
#[derive(Parser, Debug, Clone)]
#[command(name = "batch_scraper", version)]
#[command(about = "按批次并行调度分类抓取 worker")]
pub struct Cli {
    /// 每批分类数
    #[arg(long, default_value_t = 6)]
    pub batch_size: usize,

    /// 并行批次数
    #[arg(long, default_value_t = 4)]
    pub parallel_jobs: usize,

    /// 每批最多抓取的题目数
    #[arg(long, default_value_t = 5000)]
    pub questions_per_batch: u32,

    /// 速度档位
    #[arg(long, value_enum, default_value_t = SpeedProfile::Fast)]
    pub speed_profile: SpeedProfile,

    /// 批次生成策略
    #[arg(long, value_enum, default_value_t = Strategy::Balanced)]
    pub strategy: Strategy,

    /// 分类 JSON 文件
    #[arg(long, default_value = "output/all_categories.json")]
    pub categories_file: PathBuf,

    /// 只分析分类，不运行 worker
    #[arg(long)]
    pub analyze_only: bool,

    /// 从指定批次（从1开始）续跑
    #[arg(long)]
    pub resume_from_batch: Option<usize>,

    /// 单批超时（秒）
    #[arg(long, default_value_t = 3600)]
    pub timeout: u64,

    /// 不传 --backup 给 worker
    #[arg(long)]
    pub no_backup: bool,

    /// TOML 配置文件
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 查看之前的结果文件，不执行任何批次
    #[arg(long, value_name = "RESULTS_FILE")]
    pub inspect: Option<PathBuf>,
}

impl Cli {
    /// 转换为运行参数
    ///
    /// `worker_concurrency` 来自配置，不暴露为命令行参数
    pub fn to_request(&self, worker_concurrency: usize) -> RunRequest {
        RunRequest {
            categories_file: self.categories_file.clone(),
            batch_size: self.batch_size,
            parallel_jobs: self.parallel_jobs,
            strategy: self.strategy,
            resume_from_batch: self.resume_from_batch,
            analyze_only: self.analyze_only,
            options: RunOptions {
                speed_profile: self.speed_profile,
                max_questions: self.questions_per_batch,
                concurrency: worker_concurrency,
                backup: !self.no_backup,
                timeout: Duration::from_secs(self.timeout),
            },
        }
    }
}
