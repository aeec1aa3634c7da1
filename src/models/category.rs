use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// 单个分类
///
/// 以分类页 URL 作为标识，加载后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// 分类 URL
    pub url: String,
    /// 所属领域（如 entertainment / history）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Category {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// 分类名：URL 最后一段去掉 `.html`
    pub fn name(&self) -> &str {
        let last = self
            .url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.url);
        last.strip_suffix(".html").unwrap_or(last)
    }

    /// 不区分大小写地判断 URL 是否包含关键词
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.url.to_lowercase().contains(&keyword.to_lowercase())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// 提取 URL 的首个路径段
///
/// 先去掉配置的公共前缀；不匹配前缀时去掉 `scheme://host/` 部分。
pub fn leading_segment(url: &str, prefix: &str) -> String {
    // `scheme://host/`，常量模式，只编译一次
    static ORIGIN: OnceLock<Option<Regex>> = OnceLock::new();
    let origin = ORIGIN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/]+/?").ok());

    let rest = match url.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() => rest,
        _ => match origin.as_ref().and_then(|re| re.find(url)) {
            Some(m) => &url[m.end()..],
            None => url,
        },
    };

    rest.trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// 分类目录
///
/// 启动时加载一次，之后只读。
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    /// 领域 → 测验数量
    pub domain_counts: HashMap<String, u64>,
    /// 按文件顺序排列的分类
    pub categories: Vec<Category>,
    /// 来源文件
    pub source: PathBuf,
}

impl CategoryCatalog {
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// 领域分布，按数量降序（同数量按名称）
    pub fn domain_distribution(&self) -> Vec<(String, u64)> {
        let mut domains: Vec<(String, u64)> = self
            .domain_counts
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        domains.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        domains
    }
}
