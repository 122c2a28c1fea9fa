use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Shown,
    Hidden,
    NotFound,
}

/// 按 id 切换元素显隐；找不到元素时页面保持不变。
pub fn toggle_visibility(page: &mut Page, id: &str) -> ToggleOutcome {
    let Some(el) = page.element_by_id_mut(id) else {
        tracing::debug!(id, "toggle 目标不存在");
        return ToggleOutcome::NotFound;
    };
    el.hidden = !el.hidden;
    if el.hidden {
        ToggleOutcome::Hidden
    } else {
        ToggleOutcome::Shown
    }
}
