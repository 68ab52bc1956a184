use std::ops::Range;

use colonmoji_core::{
    error::SurfaceError,
    key_event::InputEvent,
    layout::Rect,
    surface::{Caret, EditingSurface, NodeId, SurfaceId, byte_index, char_len},
};
use tracing::trace;

#[derive(Debug, Clone)]
struct TextNode {
    id: NodeId,
    text: String,
}

/// 一个可编辑区域：每行一个文本节点。
#[derive(Debug, Clone)]
pub struct Document {
    id: SurfaceId,
    nodes: Vec<TextNode>,
    caret: Caret,
    bounds: Rect,
    next_node: u64,
    /// 收到的合成 `input` 事件数
    input_events: usize,
}

impl Document {
    pub fn new(id: u64) -> Self {
        Self::with_text(id, "")
    }

    /// 按 `\n` 切成多个节点，光标放在末尾。
    pub fn with_text(id: u64, text: &str) -> Self {
        let mut doc = Self {
            id: SurfaceId(id),
            nodes: Vec::new(),
            caret: Caret {
                node: NodeId(0),
                offset: 0,
            },
            bounds: Rect::new(16.0, 16.0, 480.0, 96.0),
            next_node: 0,
            input_events: 0,
        };
        for line in text.split('\n') {
            let id = doc.fresh_id();
            doc.nodes.push(TextNode {
                id,
                text: line.to_owned(),
            });
        }
        if let Some(last) = doc.nodes.last() {
            doc.caret = Caret {
                node: last.id,
                offset: char_len(&last.text),
            };
        }
        doc
    }

    fn fresh_id(&mut self) -> NodeId {
        self.next_node += 1;
        NodeId(self.next_node)
    }

    fn caret_index(&self) -> usize {
        self.nodes
            .iter()
            .position(|n| n.id == self.caret.node)
            .unwrap_or(self.nodes.len() - 1)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut TextNode> {
        self.nodes.iter_mut().find(|n| n.id == node)
    }

    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn input_events(&self) -> usize {
        self.input_events
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// 宿主自己的输入管线：在光标处插入一个字符。
    pub fn type_char(&mut self, ch: char) {
        if ch == '\n' {
            self.new_line();
            return;
        }
        let idx = self.caret_index();
        let node = &mut self.nodes[idx];
        let b = byte_index(&node.text, self.caret.offset).unwrap_or(node.text.len());
        node.text.insert(b, ch);
        self.caret = Caret {
            node: node.id,
            offset: self.caret.offset + 1,
        };
    }

    pub fn type_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.type_char(ch);
        }
    }

    /// 删除光标前一个字符；在行首时与上一行合并。
    pub fn backspace(&mut self) {
        let idx = self.caret_index();
        if self.caret.offset > 0 {
            let node = &mut self.nodes[idx];
            let offset = self.caret.offset - 1;
            if let Some(b) = byte_index(&node.text, offset) {
                node.text.remove(b);
                self.caret.offset = offset;
            }
        } else if idx > 0 {
            let removed = self.nodes.remove(idx);
            let prev = &mut self.nodes[idx - 1];
            let offset = char_len(&prev.text);
            prev.text.push_str(&removed.text);
            self.caret = Caret {
                node: prev.id,
                offset,
            };
        }
    }

    /// 在光标处断行：光标后的文本进入新节点。
    pub fn new_line(&mut self) {
        let idx = self.caret_index();
        let id = self.fresh_id();
        let node = &mut self.nodes[idx];
        let b = byte_index(&node.text, self.caret.offset).unwrap_or(node.text.len());
        let rest = node.text.split_off(b);
        self.nodes.insert(idx + 1, TextNode { id, text: rest });
        self.caret = Caret { node: id, offset: 0 };
    }

    pub fn move_left(&mut self) {
        let idx = self.caret_index();
        if self.caret.offset > 0 {
            self.caret.offset -= 1;
        } else if idx > 0 {
            let prev = &self.nodes[idx - 1];
            self.caret = Caret {
                node: prev.id,
                offset: char_len(&prev.text),
            };
        }
    }

    pub fn move_right(&mut self) {
        let idx = self.caret_index();
        if self.caret.offset < char_len(&self.nodes[idx].text) {
            self.caret.offset += 1;
        } else if let Some(next) = self.nodes.get(idx + 1) {
            self.caret = Caret {
                node: next.id,
                offset: 0,
            };
        }
    }

    /// 浏览器对未被 `preventDefault` 的按键执行的默认行为。
    pub fn apply_default(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::Char(ch) => self.type_char(ch),
            InputEvent::Backspace => self.backspace(),
            InputEvent::Enter => self.new_line(),
            InputEvent::ArrowLeft => self.move_left(),
            InputEvent::ArrowRight => self.move_right(),
            _ => {}
        }
    }

    /// 模拟框架驱动的编辑器重渲染：所有文本节点换成新节点，旧 `NodeId` 全部失效。
    pub fn rerender(&mut self) {
        let caret_idx = self.caret_index();
        for i in 0..self.nodes.len() {
            let id = self.fresh_id();
            self.nodes[i].id = id;
        }
        self.caret.node = self.nodes[caret_idx].id;
        trace!(surface = ?self.id, "document re-rendered");
    }
}

impl EditingSurface for Document {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn caret(&self) -> Option<Caret> {
        Some(self.caret)
    }

    fn text_before_caret(&self) -> Option<String> {
        let mut out = String::new();
        for node in &self.nodes {
            if node.id == self.caret.node {
                out.push_str(&node.text[..byte_index(&node.text, self.caret.offset)?]);
                return Some(out);
            }
            out.push_str(&node.text);
            out.push('\n');
        }
        None
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        self.nodes.iter().find(|n| n.id == node).map(|n| n.text.clone())
    }

    fn replace_range(&mut self, node: NodeId, range: Range<usize>, value: &str) -> Result<(), SurfaceError> {
        let target = self.node_mut(node).ok_or(SurfaceError::DetachedNode(node))?;
        let len = char_len(&target.text);
        let (Some(start), Some(end)) = (byte_index(&target.text, range.start), byte_index(&target.text, range.end))
        else {
            return Err(SurfaceError::OffsetOutOfRange {
                node,
                offset: range.end,
                len,
            });
        };
        target.text.replace_range(start..end, value);
        Ok(())
    }

    fn set_caret(&mut self, caret: Caret) -> Result<(), SurfaceError> {
        let target = self
            .nodes
            .iter()
            .find(|n| n.id == caret.node)
            .ok_or(SurfaceError::DetachedNode(caret.node))?;
        let len = char_len(&target.text);
        if caret.offset > len {
            return Err(SurfaceError::OffsetOutOfRange {
                node: caret.node,
                offset: caret.offset,
                len,
            });
        }
        self.caret = caret;
        Ok(())
    }

    fn dispatch_input(&mut self) {
        self.input_events += 1;
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
