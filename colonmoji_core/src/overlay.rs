//! `overlay`：建议列表的状态机。
//!
//! 状态：`Closed` / `Open { anchor, candidates, selected }`。
//! 不变量：打开时 `candidates` 非空且 `selected < candidates.len()`；用枚举表达，
//! 空列表无法处于打开状态。
use crate::{model::CandidateEntry, surface::SurfaceId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Open {
        anchor: SurfaceId,
        candidates: Vec<CandidateEntry>,
        selected: usize,
    },
}

impl OverlayState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn anchor(&self) -> Option<SurfaceId> {
        match self {
            Self::Open { anchor, .. } => Some(*anchor),
            Self::Closed => None,
        }
    }

    /// 打开（或刷新）在 `anchor` 上。
    ///
    /// 空候选等价于关闭；候选集合不变时保留高亮位置，否则回到 0。
    /// 返回状态是否发生变化。
    pub fn open(&mut self, anchor: SurfaceId, candidates: Vec<CandidateEntry>) -> bool {
        if candidates.is_empty() {
            return self.close();
        }
        if let Self::Open {
            anchor: a,
            candidates: c,
            ..
        } = self
        {
            if *a == anchor && *c == candidates {
                return false;
            }
        }
        *self = Self::Open {
            anchor,
            candidates,
            selected: 0,
        };
        true
    }

    /// 关闭；已关闭时是 no-op。返回状态是否发生变化。
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = Self::Closed;
        was_open
    }

    /// 高亮移动 `step`，夹在 `[0, len-1]`，不回绕。
    pub fn navigate(&mut self, step: isize) -> bool {
        let Self::Open {
            candidates,
            selected,
            ..
        } = self
        else {
            return false;
        };
        let last = candidates.len() - 1;
        let next = selected.saturating_add_signed(step).min(last);
        let changed = next != *selected;
        *selected = next;
        changed
    }

    pub fn candidates(&self) -> &[CandidateEntry] {
        match self {
            Self::Open { candidates, .. } => candidates,
            Self::Closed => &[],
        }
    }

    pub fn selected_index(&self) -> usize {
        match self {
            Self::Open { selected, .. } => *selected,
            Self::Closed => 0,
        }
    }

    pub fn selected(&self) -> Option<&CandidateEntry> {
        self.candidates().get(self.selected_index())
    }
}
