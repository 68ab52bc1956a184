use std::{fs, io, path::Path};

use colonmoji_core::{model::CandidateEntry, store::CandidateStore};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct Dataset {
    all: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(alias = "value")]
    emoji: String,
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
}

impl From<RawEntry> for CandidateEntry {
    fn from(raw: RawEntry) -> Self {
        CandidateEntry::new(raw.emoji, raw.name, raw.aliases)
    }
}

/// JSON 格式：
///
/// - 顶层 `{ "all": [ ... ] }`
/// - 每项 `{ "emoji": "🙂", "name": "slightly_smiling_face", "aliases": ["smile"] }`
/// - `emoji` 也可以写作 `value`；`aliases` 可省略
///
/// 条目顺序即候选顺序；`name` 重复的条目全部保留。
pub fn from_json_str(s: &str) -> Result<CandidateStore, LoadError> {
    let dataset: Dataset = serde_json::from_str(s)?;
    Ok(dataset.all.into_iter().map(CandidateEntry::from).collect())
}

pub fn load_path(path: impl AsRef<Path>) -> Result<CandidateStore, LoadError> {
    let s = fs::read_to_string(path)?;
    from_json_str(&s)
}

/// 加载失败时记日志并返回空存储：系统退化为“检测到触发，但没有候选”。
pub fn load_or_empty(path: impl AsRef<Path>) -> CandidateStore {
    let path = path.as_ref();
    match load_path(path) {
        Ok(store) => {
            debug!(path = %path.display(), entries = store.len(), "dataset loaded");
            store
        }
        Err(err) => {
            error!(path = %path.display(), %err, "error loading candidate dataset");
            CandidateStore::empty()
        }
    }
}
