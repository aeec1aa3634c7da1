use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
///
/// 只有配置类错误会中止整个运行；单个批次的失败/超时/崩溃
/// 都作为 `BatchResult` 数据记录，不会走这里。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（启动前即失败，不会派发任何批次）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 文件读写错误
    #[error("文件错误 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化/反序列化失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML 配置文件解析失败
    #[error("TOML解析失败 ({}): {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 分类文件不存在
    #[error("分类文件不存在: {}（请先运行 `python src/main.py --dump-categories-only` 导出分类）", .path.display())]
    CatalogNotFound { path: PathBuf },

    /// 分类文件无法读取或格式错误
    #[error("分类文件无效 ({}): {reason}", .path.display())]
    CatalogInvalid { path: PathBuf, reason: String },

    /// 分类文件中没有任何分类
    #[error("分类文件中没有找到分类URL: {}", .path.display())]
    EmptyCatalog { path: PathBuf },

    /// 批次大小必须 >= 1
    #[error("批次大小必须大于 0 (当前: {0})")]
    InvalidBatchSize(usize),

    /// 并行数必须 >= 1
    #[error("并行任务数必须大于 0 (当前: {0})")]
    InvalidParallelism(usize),

    /// 单次 worker 调用的分类上限必须 >= 1
    #[error("max_worker_categories 必须大于 0 (当前: {0})")]
    InvalidWorkerCategories(usize),

    /// 结果目录无法创建或不是目录
    #[error("结果目录不可用 ({}): {reason}", .path.display())]
    ResultsDirUnavailable { path: PathBuf, reason: String },

    /// 续跑批次号超出计划范围
    #[error("续跑批次 {requested} 超出范围，共 {total} 个批次")]
    ResumeOutOfRange { requested: usize, total: usize },
}

impl AppError {
    /// 创建文件读写错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否为配置类错误
    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
