use std::{
    collections::HashMap,
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::bootstrap::{bootstrap, PageBindings};
use crate::clipboard::{ClipboardHelper, CopyRequest};
use crate::config::{KeyAction, ViewerConfig};
use crate::page::{ElementKind, Page, Route};
use crate::render::{self, ANSWER_ID, EXPLANATION_ID, FILTER_FORM, QUESTION_TEXT_ID};
use crate::store::{ListQuery, QuestionBank};
use crate::toast::Toasts;
use crate::toggle::{toggle_visibility, ToggleOutcome};
use crate::ui::Theme;

pub struct App {
    pub bank: QuestionBank,
    pub data_path: PathBuf,
    pub config: ViewerConfig,
    pub keymap: HashMap<char, KeyAction>,
    pub theme: Theme,
    pub page: Page,
    bindings: Option<PageBindings>,
    pub toasts: Toasts,
    pub clipboard: ClipboardHelper,
}

impl App {
    pub fn new(
        bank: QuestionBank,
        data_path: PathBuf,
        config: ViewerConfig,
        theme: Theme,
        clipboard: ClipboardHelper,
    ) -> Self {
        let keymap = config.keymap();
        let toasts = Toasts::new(config.toast_duration());
        let start = ListQuery {
            per_page: config.per_page,
            ..ListQuery::default()
        };
        let page = render::list_page(&bank, &start);
        let mut app = Self {
            bank,
            data_path,
            config,
            keymap,
            theme,
            page,
            bindings: None,
            toasts,
            clipboard,
        };
        app.bindings = Some(bootstrap(&app.page, &app.config));
        app
    }

    pub fn auto_submit_active(&self) -> bool {
        self.bindings
            .as_ref()
            .is_some_and(|b| b.filters.is_active())
    }

    /// 跳转到新页面：卸载旧绑定、渲染、重新初始化。
    pub fn navigate(&mut self, route: Route) {
        let route = match route {
            Route::List(q) if q.per_page != self.config.per_page => Route::List(ListQuery {
                per_page: self.config.per_page,
                ..q
            }),
            other => other,
        };
        let Some(page) = render::render(&self.bank, &route) else {
            tracing::warn!(?route, "页面不存在");
            self.toasts.show("题目不存在", None);
            return;
        };
        if let Some(old) = self.bindings.take() {
            old.teardown();
        }
        tracing::info!(title = %page.title, "打开页面");
        self.page = page;
        self.bindings = Some(bootstrap(&self.page, &self.config));
    }

    /// 每轮事件循环调用：处理剪贴板结果、清理过期提示。
    pub fn tick(&mut self, now: Instant) {
        self.clipboard.poll(&mut self.toasts);
        self.toasts.expire(now);
    }

    pub fn reload(&mut self) -> Result<()> {
        self.bank = QuestionBank::load(&self.data_path)
            .with_context(|| format!("重新载入题库失败: {}", self.data_path.display()))?;
        let route = self.page.route.clone();
        self.navigate(route);
        self.toasts.show(format!("已重新载入 {} 题", self.bank.len()), None);
        Ok(())
    }

    /// 处理按键，返回 true 表示退出。
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.kind == KeyEventKind::Release {
            return Ok(false);
        }
        let routes = match &self.bindings {
            Some(b) => b.navigator.handle_key(&key, &self.page),
            None => Vec::new(),
        };
        if !routes.is_empty() {
            // 多个链接同时命中时依次激活，最后一个生效
            for r in routes {
                self.navigate(r);
            }
            return Ok(false);
        }
        let action = match key.code {
            KeyCode::Esc => Some(KeyAction::Quit),
            KeyCode::Down | KeyCode::Tab => Some(KeyAction::FocusNext),
            KeyCode::Up | KeyCode::BackTab => Some(KeyAction::FocusPrev),
            KeyCode::Enter => Some(KeyAction::Activate),
            KeyCode::Char(ch) => self.keymap.get(&ch).copied(),
            _ => None,
        };
        match action {
            Some(action) => self.apply_action(action),
            None => Ok(false),
        }
    }

    pub fn apply_action(&mut self, action: KeyAction) -> Result<bool> {
        match action {
            KeyAction::Quit => return Ok(true),
            KeyAction::FocusNext => self.page.move_focus(1),
            KeyAction::FocusPrev => self.page.move_focus(-1),
            KeyAction::Activate => {
                if let Some(route) = self.page.focus.and_then(|f| self.page.activate(f)) {
                    self.navigate(route);
                }
            }
            KeyAction::SelectPrev => self.change_focused_select(-1),
            KeyAction::SelectNext => self.change_focused_select(1),
            KeyAction::SubmitFilters => {
                if let Some(route) = self.page.submit(FILTER_FORM) {
                    self.navigate(route);
                }
            }
            KeyAction::ToggleAnswer => self.toggle(ANSWER_ID),
            KeyAction::ToggleExplanation => self.toggle(EXPLANATION_ID),
            KeyAction::CopyQuestion => self.copy_question(),
            KeyAction::BackToList => {
                if matches!(self.page.route, Route::Detail(_)) {
                    self.navigate(Route::List(ListQuery::default()));
                }
            }
            KeyAction::Reload => self.reload()?,
        }
        Ok(false)
    }

    fn change_focused_select(&mut self, delta: isize) {
        let Some(idx) = self.page.focus else {
            return;
        };
        let Some(change) = self.page.change_select(idx, delta) else {
            return;
        };
        let submitted = self
            .bindings
            .as_ref()
            .and_then(|b| b.filters.on_change(&self.page, &change));
        if let Some(route) = submitted {
            self.navigate(route);
        }
    }

    fn toggle(&mut self, id: &str) {
        if toggle_visibility(&mut self.page, id) == ToggleOutcome::NotFound {
            tracing::debug!(id, page = %self.page.title, "当前页面没有该元素");
        }
    }

    fn copy_question(&mut self) {
        let Some(text) = self.page.text_of(QUESTION_TEXT_ID).map(str::to_string) else {
            return;
        };
        if self.clipboard.copy(text) == CopyRequest::Unavailable {
            tracing::info!("剪贴板不可用");
        }
    }

    pub fn focused_kind(&self) -> Option<&ElementKind> {
        self.page
            .focus
            .and_then(|f| self.page.elements.get(f))
            .map(|e| &e.kind)
    }
}
