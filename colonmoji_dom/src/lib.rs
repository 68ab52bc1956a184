//! 内存中的宿主编辑器：模拟 contentEditable 的文本节点、光标与宿主重渲染。
//!
//! 用于 CLI 演示与端到端测试；真实页面上的实现由页面胶水层提供。
pub mod clipboard;
pub mod document;
pub mod host;

pub use clipboard::MemoryClipboard;
pub use document::Document;
