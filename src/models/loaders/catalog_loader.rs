use crate::error::{AppError, AppResult, ConfigError};
use crate::models::category::{leading_segment, Category, CategoryCatalog};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// 分类文件的原始结构
#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    raw_domains: HashMap<String, u64>,
    #[serde(default)]
    url_patterns: RawUrlPatterns,
}

#[derive(Debug, Default, Deserialize)]
struct RawUrlPatterns {
    #[serde(default)]
    categories: Vec<JsonValue>,
}

/// 从 JSON 文件加载分类目录
///
/// # 参数
/// - `path`: 分类文件路径
/// - `url_prefix`: 分类 URL 公共前缀（用于推导领域）
///
/// # 返回
/// 文件不存在、格式错误或没有分类时返回配置错误
pub async fn load_catalog(path: &Path, url_prefix: &str) -> AppResult<CategoryCatalog> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::CatalogNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        Err(e) => return Err(invalid(path, e.to_string())),
    };

    parse_catalog(&content, path, url_prefix)
}

/// 解析分类文件内容
pub fn parse_catalog(content: &str, path: &Path, url_prefix: &str) -> AppResult<CategoryCatalog> {
    let raw: RawCatalog = serde_json::from_str(content).map_err(|e| invalid(path, e.to_string()))?;

    let categories: Vec<Category> = raw
        .url_patterns
        .categories
        .iter()
        .filter_map(|record| {
            let url = record.get("url").and_then(JsonValue::as_str);
            if url.is_none() {
                tracing::debug!("跳过缺少 url 字段的分类记录: {}", record);
            }
            let url = url?;
            let domain = record
                .get("domain")
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| leading_segment(url, url_prefix));
            Some(Category::new(url).with_domain(domain))
        })
        .collect();

    if categories.is_empty() {
        return Err(ConfigError::EmptyCatalog {
            path: path.to_path_buf(),
        }
        .into());
    }

    tracing::info!("✅ 已加载 {} 个分类", categories.len());

    Ok(CategoryCatalog {
        domain_counts: raw.raw_domains,
        categories,
        source: path.to_path_buf(),
    })
}

fn invalid(path: &Path, reason: String) -> AppError {
    ConfigError::CatalogInvalid {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "https://www.funtrivia.com/quizzes/";

    #[test]
    fn test_parse_catalog() {
        let content = r#"{
            "raw_domains": {"history": 120, "music": 80},
            "url_patterns": {
                "categories": [
                    {"url": "https://www.funtrivia.com/quizzes/history/rome.html"},
                    {"url": "https://www.funtrivia.com/quizzes/music/jazz.html", "domain": "Music"},
                    {"name": "no url here"},
                    "not an object"
                ]
            }
        }"#;

        let catalog = parse_catalog(content, Path::new("c.json"), PREFIX).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.categories[0].domain.as_deref(), Some("history"));
        assert_eq!(catalog.categories[1].domain.as_deref(), Some("Music"));
        assert_eq!(catalog.domain_counts.get("history"), Some(&120));
    }

    #[test]
    fn test_parse_catalog_empty() {
        let content = r#"{"raw_domains": {}, "url_patterns": {"categories": []}}"#;
        let err = parse_catalog(content, Path::new("c.json"), PREFIX).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn test_parse_catalog_missing_section() {
        let err = parse_catalog("{}", Path::new("c.json"), PREFIX).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn test_parse_catalog_invalid_json() {
        let err = parse_catalog("{not json", Path::new("c.json"), PREFIX).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::CatalogInvalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_catalog_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_categories.json");
        let err = load_catalog(&path, PREFIX).await.unwrap_err();
        assert!(err.is_config());
        assert!(matches!(
            err,
            AppError::Config(ConfigError::CatalogNotFound { .. })
        ));
    }
}
