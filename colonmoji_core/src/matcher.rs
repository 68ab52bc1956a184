//! `matcher`：把 query token 变成候选列表。
//!
//! 当前实现 `SubstringMatcher`：
//! - 对 `name` 与每个 alias 做大小写不敏感的子串包含
//! - 保持存储顺序，不做相关性排序
//! - 空 query 命中全部条目，即返回前 N 条（刚输入 marker 时会出现一组近乎任意的候选）
use crate::{model::CandidateEntry, store::CandidateStore};

/// overlay 最多展示的候选数。
pub const MAX_CANDIDATES: usize = 8;

/// Matcher：在候选存储上查询。
pub trait Matcher: Send + Sync {
    /// 返回至多 `limit` 条（且不超过 `MAX_CANDIDATES`），顺序是存储顺序的子序列。
    fn lookup(&self, store: &CandidateStore, query: &str, limit: usize) -> Vec<CandidateEntry>;

    /// 精确匹配：第一条 `name` 或任一 alias 与 query 相等（忽略大小写）的条目。
    fn exact(&self, store: &CandidateStore, query: &str) -> Option<CandidateEntry>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl Matcher for SubstringMatcher {
    fn lookup(&self, store: &CandidateStore, query: &str, limit: usize) -> Vec<CandidateEntry> {
        let limit = limit.min(MAX_CANDIDATES);
        let needle = query.to_lowercase();
        store
            .folded()
            .filter(|(_, keys)| keys.iter().any(|k| k.contains(needle.as_str())))
            .map(|(entry, _)| entry.clone())
            .take(limit)
            .collect()
    }

    fn exact(&self, store: &CandidateStore, query: &str) -> Option<CandidateEntry> {
        let needle = query.to_lowercase();
        store
            .folded()
            .find(|(_, keys)| keys.iter().any(|k| *k == needle))
            .map(|(entry, _)| entry.clone())
    }
}
