//! `layout`：overlay 的定位规则。
//!
//! 坐标约定：`Rect` 是视口坐标（不含滚动），`Placement` 是页面坐标（已加滚动偏移）。

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// 视口尺寸与页面滚动偏移。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Below,
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub side: Side,
}

/// 下方空间足够就放在 surface 下方，否则放上方；水平方向与 surface 左边对齐。
pub fn place(surface: Rect, overlay_height: f64, viewport: Viewport, gap: f64) -> Placement {
    let left = surface.x + viewport.scroll_x;
    if surface.bottom() + gap + overlay_height <= viewport.height {
        Placement {
            left,
            top: surface.bottom() + gap + viewport.scroll_y,
            side: Side::Below,
        }
    } else {
        Placement {
            left,
            top: surface.y - gap - overlay_height + viewport.scroll_y,
            side: Side::Above,
        }
    }
}
