use crate::error::{AppError, AppResult, ConfigError};
use crate::planner::priority::{PriorityKeyword, PriorityTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 程序配置文件
///
/// 与单次运行相关的参数（批次大小、并行数等）来自命令行，
/// 这里只放 worker 调用方式和输出位置等相对稳定的配置。
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// worker 可执行程序
    pub worker_program: String,
    /// 传给 worker 的脚本路径（为空则不传）
    pub worker_script: String,
    /// 传给 worker 的并发提示
    pub worker_concurrency: usize,
    /// 单次 worker 调用最多携带的分类数
    pub max_worker_categories: usize,
    /// 分类 URL 的公共前缀，生成 worker 参数时去掉
    pub category_url_prefix: String,
    /// 失败时保留的 stderr 尾部字符数
    pub stderr_tail_chars: usize,
    /// 结果文件输出目录
    pub results_dir: PathBuf,
    /// 日志级别（RUST_LOG 优先）
    pub log_level: String,
    /// 优先关键词表（有序）
    pub priority_keywords: Vec<PriorityKeyword>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_program: "python3".to_string(),
            worker_script: "src/main.py".to_string(),
            worker_concurrency: 6,
            max_worker_categories: 6,
            category_url_prefix: "https://www.funtrivia.com/quizzes/".to_string(),
            stderr_tail_chars: 200,
            results_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            priority_keywords: PriorityTable::default().into_entries(),
        }
    }
}

impl Config {
    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载（可选），再叠加环境变量，最后校验
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => Self::from_toml_file(path)?.with_env_overrides(),
            None => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_worker_categories == 0 {
            return Err(ConfigError::InvalidWorkerCategories(0));
        }
        Ok(())
    }

    /// 解析 TOML 配置文件，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        toml::from_str(&content).map_err(|source| AppError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn with_env_overrides(self) -> Self {
        Self {
            worker_program: env_string("WORKER_PROGRAM").unwrap_or(self.worker_program),
            worker_script: env_string("WORKER_SCRIPT").unwrap_or(self.worker_script),
            worker_concurrency: env_parsed("WORKER_CONCURRENCY").unwrap_or(self.worker_concurrency),
            max_worker_categories: env_parsed("MAX_WORKER_CATEGORIES")
                .unwrap_or(self.max_worker_categories),
            category_url_prefix: env_string("CATEGORY_URL_PREFIX")
                .unwrap_or(self.category_url_prefix),
            stderr_tail_chars: env_parsed("STDERR_TAIL_CHARS").unwrap_or(self.stderr_tail_chars),
            results_dir: env_string("RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.results_dir),
            log_level: env_string("LOG_LEVEL").unwrap_or(self.log_level),
            priority_keywords: self.priority_keywords,
        }
    }

    /// 构建优先关键词表
    pub fn priority_table(&self) -> PriorityTable {
        PriorityTable::new(self.priority_keywords.clone())
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
