//! `trigger`：判断光标前是否存在一个打开的触发序列（marker + token）。
//!
//! 规则等价于正则 `marker(\w*)$`，其中 `\w` 只包含 ASCII 字母、数字与 `_`。

use crate::surface::byte_index;

pub const DEFAULT_MARKER: char = ':';

/// token 允许的字符。
pub fn is_word(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// 触发检测器：持有 marker 字符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerDetector {
    marker: char,
}

impl Default for TriggerDetector {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
        }
    }
}

impl TriggerDetector {
    /// marker 不能是 token 字符或空白；非法值回退到 `:`。
    pub fn new(marker: char) -> Self {
        if is_word(marker) || marker.is_whitespace() {
            Self::default()
        } else {
            Self { marker }
        }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// 返回光标前打开的 token（可能为空串：刚输入 marker）。
    pub fn detect<'a>(&self, text_before_caret: &'a str) -> Option<&'a str> {
        let token_start = text_before_caret.trim_end_matches(is_word).len();
        let head = &text_before_caret[..token_start];
        if head.ends_with(self.marker) {
            Some(&text_before_caret[token_start..])
        } else {
            None
        }
    }

    /// `:token:` 形式：marker 再次闭合了一个非空 token。
    pub fn detect_closed<'a>(&self, text_before_caret: &'a str) -> Option<&'a str> {
        let open = text_before_caret.strip_suffix(self.marker)?;
        self.detect(open).filter(|token| !token.is_empty())
    }

    /// 光标前的完整触发文本（marker + token）。
    pub fn trigger_text(&self, text_before_caret: &str) -> Option<String> {
        let token = self.detect(text_before_caret)?;
        let mut s = String::with_capacity(token.len() + self.marker.len_utf8());
        s.push(self.marker);
        s.push_str(token);
        Some(s)
    }

    /// 在节点文本中，从字符位置 `end` 向左找触发 span 的起点：
    /// 最靠右、且与 `end` 之间没有空白或其他 marker 的 marker。
    pub fn span_start(&self, text: &str, end: usize) -> Option<usize> {
        let end_byte = byte_index(text, end)?;
        let mut pos = end;
        for ch in text[..end_byte].chars().rev() {
            pos -= 1;
            if ch == self.marker {
                return Some(pos);
            }
            if ch.is_whitespace() {
                return None;
            }
        }
        None
    }
}
