use crate::{layout::Placement, surface::SurfaceId};

/// 候选条目（可被 overlay 展示与用户选择）。
///
/// 注意：`name` 在数据源里**不保证唯一**，任何逻辑都不能拿它当主键。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    /// 插入文本（原样替换，不做 Unicode 规范化）
    pub value: String,
    /// 主查询键
    pub name: String,
    /// 附加查询键（保持数据源顺序）
    pub aliases: Vec<String>,
}

impl CandidateEntry {
    pub fn new(value: impl Into<String>, name: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            value: value.into(),
            name: name.into(),
            aliases,
        }
    }

    /// 所有查询键：先 `name`，再按顺序的 `aliases`。
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// 列表里展示的短码，例如 `:grin:`。
    pub fn label(&self, marker: char) -> String {
        format!("{marker}{}{marker}", self.name)
    }
}

/// overlay 中的一行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub value: String,
    pub label: String,
    pub highlighted: bool,
}

/// 给宿主渲染层的只读快照。
///
/// 宿主只读 `OverlayView`，不直接读写 `OverlayState`。
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    /// 所属 editing surface
    pub anchor: SurfaceId,
    pub options: Vec<OptionView>,
    /// 相对页面（已含滚动偏移）的位置
    pub placement: Placement,
}
