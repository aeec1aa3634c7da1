use crate::models::{Category, CategoryCatalog};
use crate::planner::priority::PriorityTable;
use std::ops::RangeInclusive;
use tracing::info;

/// 分类分析结果（仅用于展示和批次数建议）
#[derive(Debug, Clone)]
pub struct CategoryAnalysis {
    pub total_categories: usize,
    /// 领域分布，按测验数降序
    pub domain_distribution: Vec<(String, u64)>,
    pub priority_categories: Vec<Category>,
    pub recommended_batches: RangeInclusive<usize>,
}

impl CategoryAnalysis {
    pub fn new(catalog: &CategoryCatalog, table: &PriorityTable) -> Self {
        let (priority_categories, _) = table.split(&catalog.categories);
        Self {
            total_categories: catalog.len(),
            domain_distribution: catalog.domain_distribution(),
            priority_categories,
            recommended_batches: recommended_batches(catalog.len()),
        }
    }
}

/// 根据分类总数给出建议的批次数范围
pub fn recommended_batches(total: usize) -> RangeInclusive<usize> {
    if total > 80 {
        8..=12
    } else if total > 40 {
        6..=8
    } else {
        4..=6
    }
}

/// 打印分类分析
pub fn log_analysis(analysis: &CategoryAnalysis) {
    info!("\n📊 分类分析");
    info!("{}", "=".repeat(50));
    info!("分类总数: {}", analysis.total_categories);
    info!(
        "建议批次数: {}-{}",
        analysis.recommended_batches.start(),
        analysis.recommended_batches.end()
    );

    info!("\n🏆 测验数最多的领域:");
    for (domain, count) in analysis.domain_distribution.iter().take(10) {
        info!("  {}: {} 个测验", domain, count);
    }

    let total_priority = analysis.priority_categories.len();
    info!("\n⭐ 优先分类 ({}):", total_priority);
    for (i, category) in analysis.priority_categories.iter().take(10).enumerate() {
        info!("  {}. {}", i + 1, category.name());
    }
    if total_priority > 10 {
        info!("  ... 以及另外 {} 个", total_priority - 10);
    }
}
