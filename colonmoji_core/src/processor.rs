//! `processor`：按键事件处理链。
//!
//! 按顺序处理 `InputEvent`，对 `Context` 做状态变更，并产生 `Action`。
//!
//! 当前链路（`Session::new` 默认组装）：
//! - `CompositionGuard`：组字期间吞掉事件，什么都不做（也不 preventDefault）
//! - `NavigationProcessor`：ArrowUp/ArrowDown 移动高亮
//! - `CommitProcessor`：Enter/Tab 选中高亮候选
//! - `DismissProcessor`：Escape 关闭 overlay
//! - `TriggerProcessor`：会改动文本或光标的按键交给宿主，并签发延迟重算 ticket
use web_time::Instant;

use crate::{
    context::Context,
    key_event::{Action, InputEvent},
    replace::SpanSource,
    surface::EditingSurface,
};

/// Processor 执行结果：是否“消费”了本次事件。
///
/// - `Consume`：本 processor 已处理该事件，后续 processor 不再执行
/// - `Continue`：交给下一个 processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Consume,
    Continue,
}

pub trait Processor: Send + Sync {
    fn process(
        &mut self,
        context: &mut Context,
        surface: &mut dyn EditingSurface,
        input_event: &InputEvent,
        now: Instant,
    ) -> (ProcessStatus, Vec<Action>);
}

pub struct CompositionGuard;

impl Processor for CompositionGuard {
    fn process(
        &mut self,
        context: &mut Context,
        _surface: &mut dyn EditingSurface,
        _input_event: &InputEvent,
        _now: Instant,
    ) -> (ProcessStatus, Vec<Action>) {
        if context.composing {
            (ProcessStatus::Consume, Vec::new())
        } else {
            (ProcessStatus::Continue, Vec::new())
        }
    }
}

pub struct NavigationProcessor;

impl Processor for NavigationProcessor {
    fn process(
        &mut self,
        context: &mut Context,
        surface: &mut dyn EditingSurface,
        input_event: &InputEvent,
        _now: Instant,
    ) -> (ProcessStatus, Vec<Action>) {
        if !context.is_open_on(surface.id()) {
            return (ProcessStatus::Continue, Vec::new());
        }
        let step = match *input_event {
            InputEvent::ArrowDown => 1,
            InputEvent::ArrowUp => -1,
            _ => return (ProcessStatus::Continue, Vec::new()),
        };
        let mut actions = vec![Action::PreventDefault];
        if (&mut context.overlay).navigate(step) {
            actions.push(Action::Render);
        }
        (ProcessStatus::Consume, actions)
    }
}

pub struct CommitProcessor;

impl Processor for CommitProcessor {
    fn process(
        &mut self,
        context: &mut Context,
        surface: &mut dyn EditingSurface,
        input_event: &InputEvent,
        now: Instant,
    ) -> (ProcessStatus, Vec<Action>) {
        if !matches!(*input_event, InputEvent::Enter | InputEvent::Tab) || !context.is_open_on(surface.id()) {
            return (ProcessStatus::Continue, Vec::new());
        }
        let Some(value) = context.overlay.selected().map(|e| e.value.clone()) else {
            return (ProcessStatus::Continue, Vec::new());
        };
        // 键盘选择：用实时光标，键盘快照此时不可能过期
        context.snapshot = None;
        let outcome = context.commit(surface, &value, SpanSource::LiveCaret, now);
        if !outcome.iter().any(|a| matches!(a, Action::Commit { .. })) {
            // 什么都没插入：overlay 已关闭，按键照常交给宿主
            return (ProcessStatus::Continue, outcome);
        }
        let mut actions = vec![Action::PreventDefault];
        actions.extend(outcome);
        (ProcessStatus::Consume, actions)
    }
}

pub struct DismissProcessor;

impl Processor for DismissProcessor {
    fn process(
        &mut self,
        context: &mut Context,
        surface: &mut dyn EditingSurface,
        input_event: &InputEvent,
        _now: Instant,
    ) -> (ProcessStatus, Vec<Action>) {
        match *input_event {
            InputEvent::Escape if context.is_open_on(surface.id()) => {
                let mut actions = vec![Action::PreventDefault];
                actions.append(&mut context.dismiss());
                (ProcessStatus::Consume, actions)
            }
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

pub struct TriggerProcessor;

impl Processor for TriggerProcessor {
    fn process(
        &mut self,
        context: &mut Context,
        surface: &mut dyn EditingSurface,
        input_event: &InputEvent,
        _now: Instant,
    ) -> (ProcessStatus, Vec<Action>) {
        let id = surface.id();
        // Escape/修饰键不改变光标前文本，不重算（否则刚关闭的 overlay 会被重新打开）
        match *input_event {
            InputEvent::Escape => {
                (&mut context.deferrals).cancel(id);
                return (ProcessStatus::Continue, Vec::new());
            }
            InputEvent::Other => return (ProcessStatus::Continue, Vec::new()),
            _ => {}
        }
        if !context.is_attached(id) {
            return (ProcessStatus::Continue, Vec::new());
        }
        let ticket = (&mut context.deferrals).schedule(id);
        (ProcessStatus::Consume, vec![Action::Defer(ticket)])
    }
}
