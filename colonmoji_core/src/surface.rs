//! `surface`：宿主编辑区域的能力接口。
//!
//! 约定：
//! - 所有 offset 都是**字符**（Unicode scalar）下标，不是字节下标
//! - `NodeId` 只在节点仍挂在文档里时有效；宿主重新渲染后旧 id 失效
//! - core 只通过这里的方法读写 DOM，从不假设宿主的节点结构
use std::ops::Range;

use crate::{error::SurfaceError, layout::Rect};

/// 编辑区域标识（由 Attachment Layer 分配）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// 文本节点标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// 实时光标位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub node: NodeId,
    pub offset: usize,
}

/// 按键时刻捕获的光标快照。
///
/// DOM 一旦变更快照即可能过期：每次按键重新捕获，每次插入最多消费一次。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSnapshot {
    pub node: NodeId,
    pub offset: usize,
    /// 从第一个文本节点到光标的全部文本
    pub text_before_caret: String,
}

/// 宿主编辑区域（contentEditable 或其模拟）。
pub trait EditingSurface {
    fn id(&self) -> SurfaceId;

    /// 当前光标；光标不在文本节点内时返回 None。
    fn caret(&self) -> Option<Caret>;

    /// 从第一个文本节点到光标的实时文本（不能来自缓存）。
    fn text_before_caret(&self) -> Option<String>;

    /// 节点的完整文本；节点已脱离文档时返回 None。
    fn text_content(&self, node: NodeId) -> Option<String>;

    /// 用 `value` 替换 `node` 内字符区间 `range`。
    fn replace_range(&mut self, node: NodeId, range: Range<usize>, value: &str) -> Result<(), SurfaceError>;

    fn set_caret(&mut self, caret: Caret) -> Result<(), SurfaceError>;

    /// 在 surface 上派发冒泡的合成 `input` 事件，让宿主编辑器同步自己的状态模型。
    fn dispatch_input(&mut self);

    /// surface 在视口中的位置。
    fn bounds(&self) -> Rect;

    fn caret_snapshot(&self) -> Option<CursorSnapshot> {
        let caret = self.caret()?;
        let text_before_caret = self.text_before_caret()?;
        Some(CursorSnapshot {
            node: caret.node,
            offset: caret.offset,
            text_before_caret,
        })
    }
}

/// 字符下标 -> 字节下标；越界返回 None（`offset == 字符数` 合法）。
pub fn byte_index(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    match text.char_indices().nth(offset) {
        Some((b, _)) => Some(b),
        None if text.chars().count() == offset => Some(text.len()),
        None => None,
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_index_handles_multibyte_text() {
        let s = "a🙂b";
        assert_eq!(byte_index(s, 0), Some(0));
        assert_eq!(byte_index(s, 1), Some(1));
        assert_eq!(byte_index(s, 2), Some(5));
        assert_eq!(byte_index(s, 3), Some(6));
        assert_eq!(byte_index(s, 4), None);
        assert_eq!(char_len(s), 3);
    }
}
