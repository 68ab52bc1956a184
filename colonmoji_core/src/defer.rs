//! `defer`：按键之后的“零延迟”重算。
//!
//! 宿主编辑器要先处理完自己的按键（修改 DOM），core 才能读取光标前文本。
//! 模型：每次按键为该 surface 签发一张新 ticket，旧 ticket 随之作废；
//! 宿主在本轮更新结束后把 ticket 交回 `Session::run_deferred`，只有最新的那张会被执行。
use std::collections::HashMap;

use crate::surface::SurfaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeferredTicket {
    surface: SurfaceId,
    generation: u64,
}

impl DeferredTicket {
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }
}

#[derive(Debug, Default)]
pub struct Deferrals {
    /// 全局单调计数：surface 重新 attach 后旧 ticket 也不会“复活”
    next: u64,
    pending: HashMap<SurfaceId, u64>,
}

impl Deferrals {
    /// 签发新 ticket，顶替该 surface 上仍未执行的旧 ticket。
    pub fn schedule(&mut self, surface: SurfaceId) -> DeferredTicket {
        self.next += 1;
        self.pending.insert(surface, self.next);
        DeferredTicket {
            surface,
            generation: self.next,
        }
    }

    pub fn is_current(&self, ticket: DeferredTicket) -> bool {
        self.pending.get(&ticket.surface) == Some(&ticket.generation)
    }

    /// 取走 ticket：仅当它仍是最新的才返回 true，且之后不能再次执行。
    pub fn take(&mut self, ticket: DeferredTicket) -> bool {
        if self.is_current(ticket) {
            self.pending.remove(&ticket.surface);
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, surface: SurfaceId) {
        self.pending.remove(&surface);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}
