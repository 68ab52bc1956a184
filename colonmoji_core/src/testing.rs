//! 单元测试用的最小 surface：若干文本节点 + 一个光标。
use std::ops::Range;

use crate::{
    error::SurfaceError,
    layout::Rect,
    surface::{Caret, EditingSurface, NodeId, SurfaceId, byte_index, char_len},
};

#[derive(Debug, Clone)]
pub(crate) struct StubSurface {
    pub id: SurfaceId,
    pub nodes: Vec<(NodeId, String)>,
    pub caret: Option<Caret>,
    pub input_events: usize,
    /// 为 true 时 `set_caret` 总是失败（宿主拒绝移动光标）
    pub reject_caret: bool,
}

impl StubSurface {
    /// 单节点，光标在末尾。
    pub fn with_text(id: u64, text: &str) -> Self {
        let node = NodeId(1);
        Self {
            id: SurfaceId(id),
            nodes: vec![(node, text.to_owned())],
            caret: Some(Caret {
                node,
                offset: char_len(text),
            }),
            input_events: 0,
            reject_caret: false,
        }
    }

    pub fn text(&self) -> String {
        self.nodes.iter().map(|(_, t)| t.as_str()).collect()
    }

    /// 在光标处输入（宿主自己的输入管线）。
    pub fn type_str(&mut self, s: &str) {
        let Some(caret) = self.caret else { return };
        if let Some((_, text)) = self.nodes.iter_mut().find(|(id, _)| *id == caret.node) {
            let b = byte_index(text, caret.offset).unwrap_or(text.len());
            text.insert_str(b, s);
            self.caret = Some(Caret {
                node: caret.node,
                offset: caret.offset + char_len(s),
            });
        }
    }

    /// 模拟宿主重渲染：节点换成新 id。
    pub fn rerender(&mut self) {
        for (id, _) in &mut self.nodes {
            id.0 += 100;
        }
        if let Some(c) = &mut self.caret {
            c.node.0 += 100;
        }
    }
}

impl EditingSurface for StubSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn caret(&self) -> Option<Caret> {
        self.caret
    }

    fn text_before_caret(&self) -> Option<String> {
        let caret = self.caret?;
        let mut out = String::new();
        for (id, text) in &self.nodes {
            if *id == caret.node {
                out.push_str(&text[..byte_index(text, caret.offset)?]);
                return Some(out);
            }
            out.push_str(text);
        }
        None
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        self.nodes.iter().find(|(id, _)| *id == node).map(|(_, t)| t.clone())
    }

    fn replace_range(&mut self, node: NodeId, range: Range<usize>, value: &str) -> Result<(), SurfaceError> {
        let (_, text) = self
            .nodes
            .iter_mut()
            .find(|(id, _)| *id == node)
            .ok_or(SurfaceError::DetachedNode(node))?;
        let len = char_len(text);
        let out_of_range = SurfaceError::OffsetOutOfRange {
            node,
            offset: range.end,
            len,
        };
        let start = byte_index(text, range.start).ok_or_else(|| out_of_range.clone())?;
        let end = byte_index(text, range.end).ok_or(out_of_range)?;
        text.replace_range(start..end, value);
        Ok(())
    }

    fn set_caret(&mut self, caret: Caret) -> Result<(), SurfaceError> {
        if self.reject_caret {
            return Err(SurfaceError::DetachedNode(caret.node));
        }
        self.text_content(caret.node).ok_or(SurfaceError::DetachedNode(caret.node))?;
        self.caret = Some(caret);
        Ok(())
    }

    fn dispatch_input(&mut self) {
        self.input_events += 1;
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 300.0, 40.0)
    }
}
