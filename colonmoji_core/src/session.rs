//! `Session`：对宿主（页面胶水层 / CLI / 测试）提供的会话对象。
//!
//! `Session` 自身不做按键判断，而是：
//! - 持有 `Context`（状态）与 processors 链（可插拔）
//! - 把每个按键依次交给 processors，直到被消费
//! - 接收 Attachment Layer 的 attach/detach/focus/composition 通知
//! - 执行延迟重算（trigger 检测 -> 匹配 -> overlay）
//! - 提供与传输无关的插入命令 `apply_insertion`
use tracing::{debug, trace, warn};
use web_time::{Duration, Instant};

use crate::{
    config::Config,
    context::Context,
    defer::DeferredTicket,
    key_event::{Action, InputEvent},
    layout::{Viewport, place},
    matcher::{MAX_CANDIDATES, Matcher},
    model::{OptionView, OverlayView},
    overlay::OverlayState,
    processor::{
        CommitProcessor, CompositionGuard, DismissProcessor, NavigationProcessor, ProcessStatus, Processor,
        TriggerProcessor,
    },
    relay::{Clipboard, RelayOutcome},
    replace::{ReplacementEngine, SpanSource},
    store::CandidateStore,
    surface::{EditingSurface, SurfaceId},
    trigger::TriggerDetector,
};

pub struct Session<M> {
    /// 匹配器
    matcher: M,
    /// 候选存储（启动后异步加载；加载前为空）
    store: CandidateStore,
    detector: TriggerDetector,
    config: Config,
    ctx: Context,
    processors: Vec<Box<dyn Processor>>,
}

impl<M> Session<M>
where
    M: Matcher,
{
    /// 创建会话（默认配置），并组装默认 processors 链。
    pub fn new(matcher: M) -> Self {
        Self::with_config(matcher, Config::default())
    }

    pub fn with_config(matcher: M, config: Config) -> Self {
        let detector = config.detector();
        Self {
            matcher,
            store: CandidateStore::empty(),
            detector,
            ctx: Context::new(ReplacementEngine::new(detector, config.cooldown())),
            config,
            processors: vec![
                Box::new(CompositionGuard),
                Box::new(NavigationProcessor),
                Box::new(CommitProcessor),
                Box::new(DismissProcessor),
                Box::new(TriggerProcessor),
            ],
        }
    }

    /// 设置候选数量上限（1..=8）；非法值回退到 8。
    pub fn candidate_limit(mut self, limit: u8) -> Self {
        self.config.max_candidates = if (1..=MAX_CANDIDATES as u8).contains(&limit) {
            limit
        } else {
            MAX_CANDIDATES as u8
        };
        self
    }

    /// 插入后的冷却时间。
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.config.cooldown_ms = u64::try_from(cooldown.as_millis()).unwrap_or(u64::MAX);
        self.ctx.replacer.set_cooldown(cooldown);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 数据集加载完成后调用；之前的一切匹配都是空结果。
    pub fn load_store(&mut self, store: CandidateStore) {
        debug!(entries = store.len(), "candidate store loaded");
        self.store = store;
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.ctx.overlay
    }

    pub fn active_surface(&self) -> Option<SurfaceId> {
        self.ctx.active
    }

    pub fn is_composing(&self) -> bool {
        self.ctx.composing
    }

    // ---- attachment contract ----

    pub fn on_surface_attached(&mut self, surface: SurfaceId) {
        if self.ctx.attached.insert(surface) {
            debug!(?surface, "surface attached");
        }
    }

    /// surface 被宿主移除：作废它的延迟计算、冷却、快照与 overlay。
    pub fn on_surface_detached(&mut self, surface: SurfaceId) -> Vec<Action> {
        if !self.ctx.attached.remove(&surface) {
            return Vec::new();
        }
        debug!(?surface, "surface detached");
        self.ctx.deferrals.cancel(surface);
        self.ctx.replacer.forget(surface);
        if self.ctx.active == Some(surface) {
            self.ctx.active = None;
        }
        if self.ctx.is_open_on(surface) {
            self.ctx.dismiss()
        } else {
            Vec::new()
        }
    }

    /// 焦点进入某个 surface；焦点换了 surface 时关闭旧 overlay。
    pub fn on_focus_in(&mut self, surface: SurfaceId) -> Vec<Action> {
        if !self.ctx.is_attached(surface) {
            trace!(?surface, "focus on unattached surface ignored");
            return Vec::new();
        }
        self.ctx.active = Some(surface);
        match self.ctx.overlay.anchor() {
            Some(anchor) if anchor != surface => self.ctx.dismiss(),
            _ => Vec::new(),
        }
    }

    pub fn on_composition_start(&mut self) -> Vec<Action> {
        self.ctx.composing = true;
        self.ctx.deferrals.cancel_all();
        self.ctx.dismiss()
    }

    pub fn on_composition_end(&mut self) {
        self.ctx.composing = false;
    }

    // ---- keyboard ----

    /// 处理一个按键（宿主 keydown 时调用）。
    ///
    /// 返回的 `Action::Defer` 需要宿主在本轮更新结束后交回 `run_deferred`。
    pub fn handle_key(&mut self, surface: &mut dyn EditingSurface, ev: InputEvent) -> Vec<Action> {
        let now = Instant::now();
        let mut actions = Vec::new();
        for p in &mut self.processors {
            let (status, mut a) = p.process(&mut self.ctx, surface, &ev, now);
            actions.append(&mut a);
            if status == ProcessStatus::Consume {
                break;
            }
        }
        actions
    }

    /// 延迟重算：重新捕获光标快照，检测触发，刷新 overlay。
    ///
    /// 被后续按键顶替、或 surface 已变化的 ticket 直接丢弃。
    pub fn run_deferred(&mut self, surface: &mut dyn EditingSurface, ticket: DeferredTicket) -> Vec<Action> {
        let id = surface.id();
        if ticket.surface() != id || !self.ctx.deferrals.take(ticket) {
            trace!(?ticket, "superseded deferred computation discarded");
            return Vec::new();
        }
        if self.ctx.composing || !self.ctx.is_attached(id) {
            return Vec::new();
        }
        let Some(snapshot) = surface.caret_snapshot() else {
            return self.lose_trigger(id);
        };

        if let Some(token) = self.detector.detect_closed(&snapshot.text_before_caret) {
            if let Some(entry) = self.matcher.exact(&self.store, token) {
                return self
                    .ctx
                    .commit(surface, &entry.value, SpanSource::ClosedShortcut, Instant::now());
            }
        }

        let Some(query) = self.detector.detect(&snapshot.text_before_caret) else {
            return self.lose_trigger(id);
        };
        let candidates = self.matcher.lookup(&self.store, query, self.config.candidate_limit());
        if candidates.is_empty() {
            return self.lose_trigger(id);
        }
        let changed = self.ctx.overlay.open(id, candidates);
        self.ctx.snapshot = Some(snapshot);
        if changed { vec![Action::Render] } else { Vec::new() }
    }

    /// `surface` 上的触发上下文丢失；只关闭锚定在它上面的 overlay。
    fn lose_trigger(&mut self, surface: SurfaceId) -> Vec<Action> {
        if self.ctx.is_open_on(surface) { self.ctx.dismiss() } else { Vec::new() }
    }

    // ---- pointer ----

    /// 页面上任意位置的指针按下；不在 overlay 内就关闭，并作废所有未执行的延迟计算。
    pub fn on_pointer_down(&mut self, inside_overlay: bool) -> Vec<Action> {
        if inside_overlay {
            return Vec::new();
        }
        self.ctx.deferrals.cancel_all();
        self.ctx.dismiss()
    }

    /// 点击 overlay 中第 `index` 项。
    pub fn on_option_click(&mut self, surface: &mut dyn EditingSurface, index: usize) -> Vec<Action> {
        if self.ctx.composing || !self.ctx.is_open_on(surface.id()) {
            return Vec::new();
        }
        let Some(value) = self.ctx.overlay.candidates().get(index).map(|e| e.value.clone()) else {
            return Vec::new();
        };
        let Some(snapshot) = self.ctx.snapshot.take() else {
            return self.ctx.dismiss();
        };
        self.ctx
            .commit(surface, &value, SpanSource::Snapshot(snapshot), Instant::now())
    }

    // ---- relay ----

    /// 与传输无关的插入命令：不需要前置 marker，直接插在 `target` 的光标处。
    ///
    /// 没有可用的 surface 时复制到剪贴板。
    pub fn apply_insertion(
        &mut self,
        value: &str,
        target: Option<&mut dyn EditingSurface>,
        clipboard: &mut dyn Clipboard,
    ) -> RelayOutcome {
        if self.ctx.composing {
            debug!("relay insertion dropped during composition");
            return RelayOutcome::Dropped;
        }
        match target {
            Some(surface) if self.ctx.is_attached(surface.id()) => {
                let actions = self.ctx.commit(surface, value, SpanSource::Bare, Instant::now());
                actions
                    .into_iter()
                    .find_map(|a| match a {
                        Action::Commit { insertion, .. } => Some(RelayOutcome::Inserted(insertion)),
                        _ => None,
                    })
                    .unwrap_or(RelayOutcome::Dropped)
            }
            _ => match clipboard.write_text(value) {
                Ok(()) => RelayOutcome::Copied {
                    status_for: self.config.status_duration(),
                },
                Err(err) => {
                    warn!(%err, "failed to copy value to clipboard");
                    RelayOutcome::Dropped
                }
            },
        }
    }

    // ---- rendering ----

    /// overlay 的渲染快照；关闭或锚定在别的 surface 时返回 None。
    pub fn view(&self, surface: &dyn EditingSurface, viewport: Viewport) -> Option<OverlayView> {
        let anchor = self.ctx.overlay.anchor()?;
        if anchor != surface.id() {
            return None;
        }
        let selected = self.ctx.overlay.selected_index();
        let marker = self.detector.marker();
        let options: Vec<OptionView> = self
            .ctx
            .overlay
            .candidates()
            .iter()
            .enumerate()
            .map(|(index, e)| OptionView {
                index,
                value: e.value.clone(),
                label: e.label(marker),
                highlighted: index == selected,
            })
            .collect();
        let height = options.len() as f64 * self.config.row_height;
        let placement = place(surface.bounds(), height, viewport, self.config.overlay_gap);
        Some(OverlayView {
            anchor,
            options,
            placement,
        })
    }
}
