//! `colonmoji_core`：纯逻辑层，不做任何 I/O。
//!
//! 设计目标：
//! - **宿主无关**：页面编辑器只通过 `EditingSurface` 能力接口被访问，core 不编码任何页面选择器
//! - **分层清晰**：trigger（检测） -> matcher（匹配） -> overlay（状态机） -> replace（替换） -> 输出 `Action`
//! - **单线程事件驱动**：所有入口都是同步调用，延迟计算由宿主在本轮更新结束后回调
pub mod config;
pub mod context;
pub mod defer;
pub mod error;
pub mod key_event;
pub mod layout;
pub mod matcher;
pub mod model;
pub mod overlay;
pub mod processor;
pub mod relay;
pub mod replace;
pub mod session;
pub mod store;
pub mod surface;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;
