//! 批次规划
//!
//! 按策略对分类排序/交错，再切分成固定大小的批次。
//! 任何策略下，所有批次的分类合起来都恰好等于输入（不丢不重）。

use crate::error::ConfigError;
use crate::models::{Batch, Category};
use crate::planner::priority::PriorityTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 批次生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// 优先分类与普通分类一对一交错
    #[default]
    Balanced,
    /// 优先分类在前，其余保持原顺序
    Priority,
    /// 保持文件顺序
    Sequential,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Balanced => "balanced",
            Strategy::Priority => "priority",
            Strategy::Sequential => "sequential",
        };
        write!(f, "{}", name)
    }
}

/// 批次规划器
#[derive(Debug, Clone, Default)]
pub struct BatchPlanner {
    table: PriorityTable,
}

impl BatchPlanner {
    pub fn new(table: PriorityTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PriorityTable {
        &self.table
    }

    /// 生成有序批次列表
    ///
    /// # 参数
    /// - `categories`: 分类列表（目录顺序）
    /// - `batch_size`: 每批分类数，必须 >= 1
    /// - `strategy`: 排序策略
    pub fn plan(
        &self,
        categories: &[Category],
        batch_size: usize,
        strategy: Strategy,
    ) -> Result<Vec<Batch>, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(batch_size));
        }

        let ordered = self.order(categories, strategy);

        Ok(ordered
            .chunks(batch_size)
            .enumerate()
            .map(|(idx, chunk)| Batch::new(idx + 1, chunk.to_vec()))
            .collect())
    }

    /// 按策略排列分类（切分之前的完整序列）
    pub fn order(&self, categories: &[Category], strategy: Strategy) -> Vec<Category> {
        match strategy {
            Strategy::Sequential => categories.to_vec(),
            Strategy::Priority => {
                let (mut priority, rest) = self.table.split(categories);
                priority.extend(rest);
                priority
            }
            Strategy::Balanced => {
                let (priority, rest) = self.table.split(categories);
                interleave(priority, rest)
            }
        }
    }
}

/// 一对一交错，短的一方用完后剩余部分直接接在后面
fn interleave<T>(first: Vec<T>, second: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(first.len() + second.len());
    let mut a = first.into_iter();
    let mut b = second.into_iter();

    loop {
        match (a.next(), b.next()) {
            (None, None) => break,
            (x, y) => out.extend(x.into_iter().chain(y)),
        }
    }

    out
}

/// 从第 `from_batch` 批（从1开始）续跑
///
/// 返回原计划中从该批开始的后缀；编号为 0 或超过批次总数时返回错误。
pub fn resume(batches: Vec<Batch>, from_batch: usize) -> Result<Vec<Batch>, ConfigError> {
    let total = batches.len();
    if from_batch == 0 || from_batch > total {
        return Err(ConfigError::ResumeOutOfRange {
            requested: from_batch,
            total,
        });
    }

    Ok(batches.into_iter().skip(from_batch - 1).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::priority::PriorityKeyword;
    use std::collections::HashMap;

    fn catalog(n: usize) -> Vec<Category> {
        let domains = ["music", "misc", "history", "animals", "sports", "hobbies", "movies"];
        (0..n)
            .map(|i| {
                Category::new(format!(
                    "https://www.funtrivia.com/quizzes/{}/cat_{}.html",
                    domains[i % domains.len()],
                    i
                ))
            })
            .collect()
    }

    fn counts(categories: &[Category]) -> HashMap<String, usize> {
        let mut map = HashMap::new();
        for c in categories {
            *map.entry(c.url.clone()).or_insert(0) += 1;
        }
        map
    }

    fn assert_partition(input: &[Category], batches: &[Batch], batch_size: usize) {
        let flat: Vec<Category> = batches
            .iter()
            .flat_map(|b| b.categories.iter().cloned())
            .collect();
        assert_eq!(flat.len(), input.len());
        assert_eq!(counts(&flat), counts(input));
        for (idx, batch) in batches.iter().enumerate() {
            assert_eq!(batch.number, idx + 1);
            assert!(!batch.is_empty());
            assert!(batch.len() <= batch_size);
        }
    }

    #[test]
    fn test_partition_all_strategies() {
        let planner = BatchPlanner::default();
        for n in [1, 2, 7, 13, 40, 95] {
            let input = catalog(n);
            for batch_size in [1, 2, 3, 6, 10, 200] {
                for strategy in [Strategy::Sequential, Strategy::Priority, Strategy::Balanced] {
                    let batches = planner.plan(&input, batch_size, strategy).unwrap();
                    assert_partition(&input, &batches, batch_size);
                    assert_eq!(batches.len(), n.div_ceil(batch_size));
                }
            }
        }
    }

    #[test]
    fn test_zero_batch_size() {
        let planner = BatchPlanner::default();
        let err = planner.plan(&catalog(3), 0, Strategy::Sequential).unwrap_err();
        assert_eq!(err, ConfigError::InvalidBatchSize(0));
    }

    #[test]
    fn test_sequential_keeps_order() {
        let planner = BatchPlanner::default();
        let input = catalog(5);
        let batches = planner.plan(&input, 2, Strategy::Sequential).unwrap();
        assert_eq!(batches[0].categories, input[0..2].to_vec());
        assert_eq!(batches[1].categories, input[2..4].to_vec());
        assert_eq!(batches[2].categories, input[4..5].to_vec());
    }

    #[test]
    fn test_priority_first() {
        let planner = BatchPlanner::default();
        let input = catalog(30);
        let ordered = planner.order(&input, Strategy::Priority);
        let priority_count = planner.table().select_indices(&input).len();
        assert!(priority_count > 0);

        // 前 priority_count 个都命中关键词，且每个关键词不超过容量
        let head = &ordered[..priority_count];
        for c in head {
            assert!(planner
                .table()
                .entries()
                .iter()
                .any(|e| c.matches_keyword(&e.keyword)));
        }
        // 其余部分保持原顺序
        let rest: Vec<&Category> = input.iter().filter(|c| !head.contains(c)).collect();
        let tail: Vec<&Category> = ordered[priority_count..].iter().collect();
        assert_eq!(tail, rest);
    }

    #[test]
    fn test_priority_cap_leaves_overflow_in_rest() {
        let table = PriorityTable::new(vec![PriorityKeyword::new("music", 2)]);
        let planner = BatchPlanner::new(table);
        let input: Vec<Category> = ["/misc/a", "/music/b", "/music/c", "/music/d", "/misc/e"]
            .iter()
            .map(|u| Category::new(*u))
            .collect();

        let ordered = planner.order(&input, Strategy::Priority);
        let urls: Vec<&str> = ordered.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["/music/b", "/music/c", "/misc/a", "/music/d", "/misc/e"]);
    }

    #[test]
    fn test_balanced_interleaves_and_degrades() {
        let table = PriorityTable::new(vec![PriorityKeyword::new("music", 10)]);
        let planner = BatchPlanner::new(table);
        let input: Vec<Category> = ["/music/1", "/music/2", "/a/1", "/a/2", "/a/3", "/a/4"]
            .iter()
            .map(|u| Category::new(*u))
            .collect();

        let ordered = planner.order(&input, Strategy::Balanced);
        let urls: Vec<&str> = ordered.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["/music/1", "/a/1", "/music/2", "/a/2", "/a/3", "/a/4"]);
    }

    #[test]
    fn test_balanced_more_priority_than_rest() {
        let table = PriorityTable::new(vec![PriorityKeyword::new("music", 10)]);
        let planner = BatchPlanner::new(table);
        let input: Vec<Category> = ["/music/1", "/a/1", "/music/2", "/music/3"]
            .iter()
            .map(|u| Category::new(*u))
            .collect();

        let batches = planner.plan(&input, 3, Strategy::Balanced).unwrap();
        let urls: Vec<&str> = batches
            .iter()
            .flat_map(|b| b.categories.iter().map(|c| c.url.as_str()))
            .collect();
        assert_eq!(urls, vec!["/music/1", "/a/1", "/music/2", "/music/3"]);
        assert_partition(&input, &batches, 3);
    }

    #[test]
    fn test_resume_suffix() {
        let planner = BatchPlanner::default();
        let batches = planner.plan(&catalog(20), 3, Strategy::Sequential).unwrap();
        let m = batches.len();
        assert_eq!(m, 7);

        for k in 1..=m {
            let resumed = resume(batches.clone(), k).unwrap();
            assert_eq!(resumed.len(), m - k + 1);
            assert_eq!(resumed[0].number, k);
            assert_eq!(resumed[0], batches[k - 1]);
        }
    }

    #[test]
    fn test_resume_out_of_range() {
        let planner = BatchPlanner::default();
        let batches = planner.plan(&catalog(4), 2, Strategy::Sequential).unwrap();

        assert_eq!(
            resume(batches.clone(), 3).unwrap_err(),
            ConfigError::ResumeOutOfRange {
                requested: 3,
                total: 2
            }
        );
        assert!(resume(batches, 0).is_err());
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::default(), Strategy::Balanced);
        assert_eq!(Strategy::Priority.to_string(), "priority");
    }
}
