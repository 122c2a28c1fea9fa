//! 题库浏览器：页面模型与页面交互（筛选自动提交、键盘导航、显隐切换、
//! 剪贴板复制、提示消息），以及驱动它们的终端界面。

pub mod app;
pub mod bootstrap;
pub mod clipboard;
pub mod config;
pub mod filters;
pub mod keynav;
pub mod logging;
pub mod page;
pub mod render;
pub mod store;
pub mod toast;
pub mod toggle;
pub mod ui;
