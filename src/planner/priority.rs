//! 优先关键词表
//!
//! 有序的 (关键词, 容量) 列表。按表中顺序依次匹配，每个关键词最多
//! 选出 `capacity` 个分类，去重后保持首次出现的顺序。

use crate::models::Category;
use phf::phf_ordered_map;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 内置优先关键词（顺序即优先级）
static DEFAULT_PRIORITY_KEYWORDS: phf::OrderedMap<&'static str, usize> = phf_ordered_map! {
    "entertainment" => 5,
    "movies" => 5,
    "music" => 5,
    "sports" => 5,
    "history" => 5,
    "science" => 5,
};

/// 单个优先关键词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityKeyword {
    pub keyword: String,
    /// 该关键词最多选出的分类数
    pub capacity: usize,
}

impl PriorityKeyword {
    pub fn new(keyword: impl Into<String>, capacity: usize) -> Self {
        Self {
            keyword: keyword.into(),
            capacity,
        }
    }
}

/// 优先关键词表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    entries: Vec<PriorityKeyword>,
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_PRIORITY_KEYWORDS
                .entries()
                .map(|(keyword, capacity)| PriorityKeyword::new(*keyword, *capacity))
                .collect(),
        )
    }
}

impl PriorityTable {
    pub fn new(entries: Vec<PriorityKeyword>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PriorityKeyword] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PriorityKeyword> {
        self.entries
    }

    /// 选出优先分类在 `categories` 中的下标
    ///
    /// 同一分类可能命中多个关键词，只保留第一次；它仍占用每个命中关键词的容量。
    pub fn select_indices(&self, categories: &[Category]) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for entry in &self.entries {
            let matching = categories
                .iter()
                .enumerate()
                .filter(|(_, c)| c.matches_keyword(&entry.keyword))
                .map(|(idx, _)| idx)
                .take(entry.capacity);

            for idx in matching {
                if seen.insert(idx) {
                    selected.push(idx);
                }
            }
        }

        selected
    }

    /// 拆分为 (优先分类, 其余分类)，两部分合起来恰好覆盖输入
    pub fn split(&self, categories: &[Category]) -> (Vec<Category>, Vec<Category>) {
        let selected = self.select_indices(categories);
        let selected_set: HashSet<usize> = selected.iter().copied().collect();

        let priority = selected.iter().map(|&idx| categories[idx].clone()).collect();
        let rest = categories
            .iter()
            .enumerate()
            .filter(|(idx, _)| !selected_set.contains(idx))
            .map(|(_, c)| c.clone())
            .collect();

        (priority, rest)
    }
}
