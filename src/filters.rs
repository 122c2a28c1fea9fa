use crate::page::{ChangeEvent, Page, Route};

/// 会触发自动提交的筛选控件名。
pub const AUTO_SUBMIT_CONTROLS: [&str; 2] = ["type", "difficulty"];

/// 筛选条件变化时自动提交所在表单（默认关闭）。
#[derive(Debug, Clone, Default)]
pub struct FilterAutoSubmit {
    watched: Vec<usize>,
}

impl FilterAutoSubmit {
    pub fn install(page: &Page, enabled: bool) -> Self {
        if !enabled {
            return Self::default();
        }
        let watched = page.selects_named(&AUTO_SUBMIT_CONTROLS);
        tracing::debug!(controls = watched.len(), "筛选自动提交已启用");
        Self { watched }
    }

    pub fn is_active(&self) -> bool {
        !self.watched.is_empty()
    }

    pub fn watches(&self, element: usize) -> bool {
        self.watched.contains(&element)
    }

    /// 处理 change 事件：被监听的控件提交其所在表单，否则什么也不做。
    pub fn on_change(&self, page: &Page, change: &ChangeEvent) -> Option<Route> {
        if !self.watches(change.element) {
            return None;
        }
        let form = page.form_of(change.element)?;
        tracing::info!(control = %change.name, value = %change.value, "筛选变化，自动提交");
        page.submit(form)
    }
}
