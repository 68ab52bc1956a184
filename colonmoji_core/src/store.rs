//! `store`：内存中的候选列表（加载一次，之后只读）。
use std::sync::Arc;

use crate::model::CandidateEntry;

#[derive(Debug)]
struct Indexed {
    entry: CandidateEntry,
    /// 预先小写化的查询键（name + aliases）
    folded: Vec<String>,
}

/// 候选存储。克隆只复制 `Arc`，可在所有 surface 之间无锁共享。
#[derive(Debug, Clone)]
pub struct CandidateStore {
    entries: Arc<[Indexed]>,
}

impl Default for CandidateStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CandidateStore {
    pub fn new(entries: Vec<CandidateEntry>) -> Self {
        let indexed: Vec<Indexed> = entries
            .into_iter()
            .map(|entry| {
                let folded = entry.keys().map(str::to_lowercase).collect();
                Indexed { entry, folded }
            })
            .collect();
        Self {
            entries: indexed.into(),
        }
    }

    /// 数据集尚未加载（或加载失败）时使用。
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CandidateEntry> {
        self.entries.get(index).map(|i| &i.entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateEntry> {
        self.entries.iter().map(|i| &i.entry)
    }

    /// 按存储顺序返回（条目, 小写查询键）。
    pub(crate) fn folded(&self) -> impl Iterator<Item = (&CandidateEntry, &[String])> {
        self.entries.iter().map(|i| (&i.entry, i.folded.as_slice()))
    }
}

impl FromIterator<CandidateEntry> for CandidateStore {
    fn from_iter<T: IntoIterator<Item = CandidateEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
