//! 宿主事件顺序的模拟：keydown -> （未被阻止时）浏览器默认行为 -> 延迟回调。
use colonmoji_core::{
    key_event::{Action, InputEvent},
    matcher::Matcher,
    session::Session,
};

use crate::document::Document;

/// 按下一个键，返回 core 产生的全部动作（包括延迟重算的结果）。
pub fn press<M: Matcher>(session: &mut Session<M>, doc: &mut Document, ev: InputEvent) -> Vec<Action> {
    let mut actions = session.handle_key(doc, ev.clone());
    if !actions.contains(&Action::PreventDefault) {
        doc.apply_default(&ev);
    }
    let tickets: Vec<_> = actions
        .iter()
        .filter_map(|a| match a {
            Action::Defer(t) => Some(*t),
            _ => None,
        })
        .collect();
    for t in tickets {
        actions.append(&mut session.run_deferred(doc, t));
    }
    actions
}

/// 逐字符输入（`\n` 视为 Enter）。
pub fn type_text<M: Matcher>(session: &mut Session<M>, doc: &mut Document, text: &str) -> Vec<Action> {
    let mut actions = Vec::new();
    for ch in text.chars() {
        let ev = if ch == '\n' { InputEvent::Enter } else { InputEvent::Char(ch) };
        actions.append(&mut press(session, doc, ev));
    }
    actions
}
