use crate::{defer::DeferredTicket, replace::Insertion};

/// 输入事件（逻辑键盘事件）。
///
/// 说明：
/// - processor 只关心“语义事件”，不关心具体平台键值
/// - 宿主层负责把 DOM `KeyboardEvent.key` 转换成这些事件（见 `from_dom_key`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// 输入一个字符
    Char(char),
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Tab,
    Escape,
    /// 其余按键（修饰键、功能键等）
    Other,
}

impl InputEvent {
    /// DOM `KeyboardEvent.key` -> `InputEvent`。
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Backspace" => Self::Backspace,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Self::Char(ch),
                    _ => Self::Other,
                }
            }
        }
    }
}

/// core 输出给宿主的动作（对 DOM/UI 的“副作用”请求）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 原生按键事件需要 `preventDefault`
    PreventDefault,
    /// 请宿主在本轮更新结束后调用 `Session::run_deferred`
    Defer(DeferredTicket),
    /// 已把文本插入 surface
    Commit { value: String, insertion: Insertion },
    /// overlay 状态变了，宿主需要重新渲染
    Render,
}
