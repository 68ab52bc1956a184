//! 错误类型。
//!
//! 这些错误都不会作为用户可见错误向外传播：`Session` 把它们记到日志里，
//! 然后按“静默取消”处理。
use thiserror::Error;

use crate::surface::{NodeId, SurfaceId};

/// `EditingSurface` 的写操作失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("text node {0:?} is no longer attached to the document")]
    DetachedNode(NodeId),
    #[error("offset {offset} is out of range for text node {node:?} (length {len})")]
    OffsetOutOfRange { node: NodeId, offset: usize, len: usize },
}

/// 替换引擎失败（全部是良性取消）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// 光标不在任何文本节点内
    #[error("no live text node under the caret")]
    NoTextNode,
    /// 快照引用的节点/offset 已经失效
    #[error("snapshot refers to stale text node {0:?}")]
    StaleReference(NodeId),
    /// 找不到 marker，触发上下文已丢失
    #[error("no trigger span before the caret")]
    NoTrigger,
    /// 同一 surface 上一次插入尚未冷却
    #[error("insertion already in progress on surface {0:?}")]
    Busy(SurfaceId),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// relay 消息解析失败。
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed relay message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown relay action `{0}`")]
    UnknownAction(String),
    #[error("relay action `{0}` is missing its value")]
    MissingValue(String),
}

/// 剪贴板写入失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard is unavailable")]
    Unavailable,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}
