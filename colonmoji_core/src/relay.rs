//! `relay`：来自独立 picker 页面的“插入某个值”命令。
//!
//! 传输方式（扩展消息、直接调用、测试）与 core 无关：宿主解析出 `RelayMessage`
//! 后调用 `Session::apply_insertion` 即可。
use serde::Deserialize;
use web_time::Duration;

use crate::{
    error::{ClipboardError, RelayError},
    replace::Insertion,
};

pub const INSERT_ACTION: &str = "insertEmoji";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    Insert { value: String },
}

#[derive(Deserialize)]
struct RawMessage {
    action: String,
    #[serde(default, alias = "value")]
    emoji: Option<String>,
}

impl RelayMessage {
    /// 解析 `{ "action": "insertEmoji", "emoji": "🙂" }`。
    pub fn from_json(s: &str) -> Result<Self, RelayError> {
        let raw: RawMessage = serde_json::from_str(s)?;
        if raw.action != INSERT_ACTION {
            return Err(RelayError::UnknownAction(raw.action));
        }
        raw.emoji
            .map(|value| Self::Insert { value })
            .ok_or(RelayError::MissingValue(raw.action))
    }
}

/// 系统剪贴板（没有可用 surface 时的回退通道）。
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// relay 命令的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// 已插入活动 surface
    Inserted(Insertion),
    /// 已复制到剪贴板；状态提示应显示 `status_for`
    Copied { status_for: Duration },
    /// 组字中、插入被拒绝、或剪贴板写入失败：什么都不显示
    Dropped,
}
