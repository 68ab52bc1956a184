//! `Context`：processor 链与 `Session` 共享的唯一状态容器。
//!
//! 约定：
//! - `overlay`：建议列表状态机（同一时刻最多锚定一个 surface）
//! - `snapshot`：overlay 打开时捕获的光标快照，供指针选择消费一次
//! - `composing`：输入法组字期间，所有触发/匹配/替换都暂停
use std::collections::BTreeSet;

use tracing::debug;
use web_time::Instant;

use crate::{
    defer::Deferrals,
    error::InsertError,
    key_event::Action,
    overlay::OverlayState,
    replace::{ReplacementEngine, SpanSource},
    surface::{CursorSnapshot, EditingSurface, SurfaceId},
};

pub struct Context {
    pub overlay: OverlayState,
    pub snapshot: Option<CursorSnapshot>,
    pub composing: bool,
    /// 最近获得焦点的 surface
    pub active: Option<SurfaceId>,
    pub attached: BTreeSet<SurfaceId>,
    pub deferrals: Deferrals,
    pub replacer: ReplacementEngine,
}

impl Context {
    pub fn new(replacer: ReplacementEngine) -> Self {
        Self {
            overlay: OverlayState::Closed,
            snapshot: None,
            composing: false,
            active: None,
            attached: BTreeSet::new(),
            deferrals: Deferrals::default(),
            replacer,
        }
    }

    pub fn is_attached(&self, surface: SurfaceId) -> bool {
        self.attached.contains(&surface)
    }

    /// overlay 是否打开在 `surface` 上。
    pub fn is_open_on(&self, surface: SurfaceId) -> bool {
        self.overlay.anchor() == Some(surface)
    }

    /// 关闭 overlay，丢弃快照，并作废锚定 surface 上未执行的延迟计算。
    pub fn dismiss(&mut self) -> Vec<Action> {
        self.snapshot = None;
        if let Some(anchor) = self.overlay.anchor() {
            self.deferrals.cancel(anchor);
        }
        if self.overlay.close() { vec![Action::Render] } else { Vec::new() }
    }

    /// 插入 `value` 并关闭 overlay。插入失败只记日志。
    pub fn commit(
        &mut self,
        surface: &mut dyn EditingSurface,
        value: &str,
        source: SpanSource,
        now: Instant,
    ) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.replacer.insert(surface, value, source, now) {
            Ok(insertion) => actions.push(Action::Commit {
                value: value.to_owned(),
                insertion,
            }),
            Err(InsertError::NoTrigger) => debug!("trigger context already gone; insertion cancelled"),
            Err(err) => debug!(surface = ?surface.id(), %err, "insertion aborted"),
        }
        actions.append(&mut self.dismiss());
        actions
    }
}
