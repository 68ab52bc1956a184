//! `replace`：把触发 span 原地替换为候选值。
//!
//! 流程：
//! 1. 确定文本节点与 span 终点（键盘：实时光标；指针：按快照文本重新计算）
//! 2. 向左找 span 起点（marker）
//! 3. 拼接：marker 之前 + value + 终点之后
//! 4. 光标移到 value 之后
//! 5. 派发合成 `input` 事件
//! 6. 同一 surface 上的插入互斥，完成后有一段冷却期
use std::collections::HashMap;

use tracing::{debug, trace};
use web_time::{Duration, Instant};

use crate::{
    error::InsertError,
    surface::{Caret, CursorSnapshot, EditingSurface, NodeId, SurfaceId, byte_index, char_len},
    trigger::TriggerDetector,
};

/// span 终点从哪里来。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanSource {
    /// 键盘选择：实时光标
    LiveCaret,
    /// 指针选择：点击 overlay 时光标可能已经不在原处，按快照重新定位
    Snapshot(CursorSnapshot),
    /// `:token:` 直接替换：span 包含末尾的闭合 marker
    ClosedShortcut,
    /// 无 marker，直接插在光标处（relay 插入）
    Bare,
}

/// 一次成功插入的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub node: NodeId,
    /// 被替换的字符区间起点
    pub start: usize,
    /// 被替换的字符区间终点（替换前）
    pub end: usize,
    /// 插入后光标位置
    pub caret: usize,
}

pub struct ReplacementEngine {
    detector: TriggerDetector,
    cooldown: Duration,
    /// surface -> 冷却结束时刻
    busy_until: HashMap<SurfaceId, Instant>,
}

impl ReplacementEngine {
    pub fn new(detector: TriggerDetector, cooldown: Duration) -> Self {
        Self {
            detector,
            cooldown,
            busy_until: HashMap::new(),
        }
    }

    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    pub fn is_busy(&self, surface: SurfaceId, now: Instant) -> bool {
        self.busy_until.get(&surface).is_some_and(|until| now < *until)
    }

    /// surface 脱离后丢弃它的冷却状态。
    pub fn forget(&mut self, surface: SurfaceId) {
        self.busy_until.remove(&surface);
    }

    /// 执行一次插入。定位失败时不改动 DOM，也不进入冷却；
    /// 文本一旦替换成功，即使光标放不回去也照常派发 `input` 并进入冷却。
    pub fn insert(
        &mut self,
        surface: &mut dyn EditingSurface,
        value: &str,
        source: SpanSource,
        now: Instant,
    ) -> Result<Insertion, InsertError> {
        let id = surface.id();
        if self.is_busy(id, now) {
            return Err(InsertError::Busy(id));
        }
        let insertion = self.apply(surface, value, source)?;
        self.busy_until.insert(id, now + self.cooldown);
        Ok(insertion)
    }

    fn apply(
        &self,
        surface: &mut dyn EditingSurface,
        value: &str,
        source: SpanSource,
    ) -> Result<Insertion, InsertError> {
        let (node, end) = match &source {
            SpanSource::Snapshot(snapshot) => {
                let text = surface
                    .text_content(snapshot.node)
                    .ok_or(InsertError::StaleReference(snapshot.node))?;
                let trigger = self
                    .detector
                    .trigger_text(&snapshot.text_before_caret)
                    .ok_or(InsertError::NoTrigger)?;
                let end = locate_trigger_end(&text, &trigger, snapshot.offset).ok_or(InsertError::NoTrigger)?;
                (snapshot.node, end)
            }
            _ => {
                let caret = surface.caret().ok_or(InsertError::NoTextNode)?;
                (caret.node, caret.offset)
            }
        };

        let text = surface.text_content(node).ok_or(InsertError::StaleReference(node))?;
        if end > char_len(&text) {
            return Err(InsertError::StaleReference(node));
        }

        let start = match source {
            SpanSource::Bare => end,
            SpanSource::ClosedShortcut => {
                let closing = end.checked_sub(1).ok_or(InsertError::NoTrigger)?;
                if text.chars().nth(closing) != Some(self.detector.marker()) {
                    return Err(InsertError::NoTrigger);
                }
                self.detector.span_start(&text, closing).ok_or(InsertError::NoTrigger)?
            }
            SpanSource::LiveCaret | SpanSource::Snapshot(_) => {
                self.detector.span_start(&text, end).ok_or(InsertError::NoTrigger)?
            }
        };
        trace!(?node, start, end, "replacing trigger span");

        surface.replace_range(node, start..end, value)?;
        let caret = start + char_len(value);
        if let Err(err) = surface.set_caret(Caret { node, offset: caret }) {
            debug!(?node, %err, "caret could not be restored after insertion");
        }
        surface.dispatch_input();

        Ok(Insertion {
            node,
            start,
            end,
            caret,
        })
    }
}

/// 在节点文本中找快照里的触发文本，返回其结束位置（字符下标）。
///
/// 优先认定以快照 offset 结尾的那一处；offset 已失真时退回最右边的出现位置。
fn locate_trigger_end(text: &str, trigger: &str, hint: usize) -> Option<usize> {
    let trigger_len = char_len(trigger);
    if let Some(b) = byte_index(text, hint) {
        if text[..b].ends_with(trigger) {
            return Some(hint);
        }
    }
    text.rfind(trigger).map(|b| char_len(&text[..b]) + trigger_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubSurface;

    fn engine(cooldown: Duration) -> ReplacementEngine {
        ReplacementEngine::new(TriggerDetector::default(), cooldown)
    }

    #[test]
    fn keyboard_insertion_replaces_the_span() {
        let mut s = StubSurface::with_text(1, "hello :gri");
        let ins = engine(Duration::ZERO)
            .insert(&mut s, "🙂", SpanSource::LiveCaret, Instant::now())
            .unwrap();
        assert_eq!(s.text(), "hello 🙂");
        assert_eq!(ins.caret, 7);
        assert_eq!(s.caret.map(|c| c.offset), Some(7));
        assert_eq!(s.input_events, 1);
    }

    #[test]
    fn text_after_the_caret_is_kept() {
        let mut s = StubSurface::with_text(1, "a :jo b");
        s.caret = Some(Caret {
            node: NodeId(1),
            offset: 5,
        });
        engine(Duration::ZERO)
            .insert(&mut s, "😂", SpanSource::LiveCaret, Instant::now())
            .unwrap();
        assert_eq!(s.text(), "a 😂 b");
        assert_eq!(s.caret.map(|c| c.offset), Some(3));
    }

    #[test]
    fn missing_marker_is_a_no_op() {
        let mut s = StubSurface::with_text(1, "hello gri");
        let err = engine(Duration::ZERO)
            .insert(&mut s, "🙂", SpanSource::LiveCaret, Instant::now())
            .unwrap_err();
        assert_eq!(err, InsertError::NoTrigger);
        assert_eq!(s.text(), "hello gri");
        assert_eq!(s.input_events, 0);
    }

    #[test]
    fn pointer_insertion_uses_the_snapshot_text() {
        let mut s = StubSurface::with_text(1, "hi :gri");
        let snapshot = s.caret_snapshot().unwrap();
        // 点击 overlay 后光标跑到了开头
        s.caret = Some(Caret {
            node: NodeId(1),
            offset: 0,
        });
        engine(Duration::ZERO)
            .insert(&mut s, "🙂", SpanSource::Snapshot(snapshot), Instant::now())
            .unwrap();
        assert_eq!(s.text(), "hi 🙂");
        assert_eq!(s.caret.map(|c| c.offset), Some(4));
    }

    #[test]
    fn pointer_insertion_tolerates_a_shifted_offset() {
        let mut s = StubSurface::with_text(1, "x :gri");
        let mut snapshot = s.caret_snapshot().unwrap();
        snapshot.offset = 2;
        engine(Duration::ZERO)
            .insert(&mut s, "🙂", SpanSource::Snapshot(snapshot), Instant::now())
            .unwrap();
        assert_eq!(s.text(), "x 🙂");
    }

    #[test]
    fn stale_snapshot_aborts_silently() {
        let mut s = StubSurface::with_text(1, "hi :gri");
        let snapshot = s.caret_snapshot().unwrap();
        s.rerender();
        let err = engine(Duration::ZERO)
            .insert(&mut s, "🙂", SpanSource::Snapshot(snapshot), Instant::now())
            .unwrap_err();
        assert_eq!(err, InsertError::StaleReference(NodeId(1)));
        assert_eq!(s.text(), "hi :gri");
    }

    #[test]
    fn closed_shortcut_consumes_both_markers() {
        let mut s = StubSurface::with_text(1, "ok :grin:");
        engine(Duration::ZERO)
            .insert(&mut s, "🙂", SpanSource::ClosedShortcut, Instant::now())
            .unwrap();
        assert_eq!(s.text(), "ok 🙂");
    }

    #[test]
    fn bare_insertion_needs_no_marker() {
        let mut s = StubSurface::with_text(1, "plain");
        let ins = engine(Duration::ZERO)
            .insert(&mut s, "👍", SpanSource::Bare, Instant::now())
            .unwrap();
        assert_eq!(s.text(), "plain👍");
        assert_eq!(ins.start, ins.end);
    }

    #[test]
    fn back_to_back_insertions_apply_once() {
        let mut s = StubSurface::with_text(1, "a :x b :y");
        let mut e = engine(Duration::from_millis(50));
        let now = Instant::now();
        assert!(e.insert(&mut s, "1", SpanSource::LiveCaret, now).is_ok());
        s.type_str(" :z");
        assert_eq!(
            e.insert(&mut s, "2", SpanSource::LiveCaret, now),
            Err(InsertError::Busy(SurfaceId(1)))
        );
        assert_eq!(s.text(), "a :x b 1 :z");
        assert!(e.insert(&mut s, "2", SpanSource::LiveCaret, now + Duration::from_millis(50)).is_ok());
        assert_eq!(s.text(), "a :x b 1 2");
    }

    #[test]
    fn caret_failure_after_splice_still_notifies_and_cools_down() {
        let mut s = StubSurface::with_text(1, "hi :gri");
        s.reject_caret = true;
        let mut e = engine(Duration::from_secs(60));
        let now = Instant::now();
        let ins = e.insert(&mut s, "🙂", SpanSource::LiveCaret, now).unwrap();
        assert_eq!(s.text(), "hi 🙂");
        assert_eq!(ins.caret, 4);
        assert_eq!(s.input_events, 1);
        assert!(e.is_busy(SurfaceId(1), now));
    }

    #[test]
    fn failed_insertion_does_not_start_cooldown() {
        let mut s = StubSurface::with_text(1, "none");
        let mut e = engine(Duration::from_secs(60));
        let now = Instant::now();
        assert!(e.insert(&mut s, "1", SpanSource::LiveCaret, now).is_err());
        assert!(!e.is_busy(SurfaceId(1), now));
    }
}
