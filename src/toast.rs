// 右下角浮动提示：到期自动移除，不去重、不可提前取消

use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    shown_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// None 表示时长超出可表示范围，永不过期。
    pub fn expires_at(&self) -> Option<Instant> {
        self.shown_at.checked_add(self.duration)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at().is_some_and(|t| now >= t)
    }
}

#[derive(Debug, Clone)]
pub struct Toasts {
    items: Vec<Toast>,
    default_duration: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl Toasts {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            items: Vec::new(),
            default_duration,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, duration: Option<Duration>) {
        self.show_at(message, duration, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, duration: Option<Duration>, now: Instant) {
        let message = message.into();
        tracing::debug!(%message, "toast");
        self.items.push(Toast {
            message,
            shown_at: now,
            duration: duration.unwrap_or(self.default_duration),
        });
    }

    /// 移除已到期的提示，返回移除数量。
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|t| !t.is_expired(now));
        before - self.items.len()
    }

    pub fn visible(&self) -> &[Toast] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
