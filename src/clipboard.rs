//! 剪贴板复制。
//!
//! 写入在后台线程进行，结果通过 channel 回到 UI 循环：成功时弹出提示，
//! 失败时只写日志。剪贴板不可用时直接返回 [`CopyRequest::Unavailable`]。

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::toast::Toasts;

pub const COPIED_MESSAGE: &str = "已复制到剪贴板";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("剪贴板不可用: {0}")]
    Unavailable(String),
    #[error("写入剪贴板失败: {0}")]
    Write(String),
}

pub trait ClipboardBackend: Send + Sync {
    fn is_available(&self) -> bool;
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// 系统剪贴板（SSH / 无图形环境下通常不可用）。
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn is_available(&self) -> bool {
        arboard::Clipboard::new().is_ok()
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut cb =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        cb.set_text(text.to_owned())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyRequest {
    Pending,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed(ClipboardError),
}

pub struct ClipboardHelper {
    backend: Arc<dyn ClipboardBackend>,
    tx: Sender<Result<(), ClipboardError>>,
    rx: Receiver<Result<(), ClipboardError>>,
}

impl ClipboardHelper {
    pub fn new(backend: Arc<dyn ClipboardBackend>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { backend, tx, rx }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClipboard))
    }

    pub fn copy(&self, text: impl Into<String>) -> CopyRequest {
        if !self.backend.is_available() {
            tracing::debug!("剪贴板不可用，跳过复制");
            return CopyRequest::Unavailable;
        }
        let text = text.into();
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            // 接收端随 helper 一起销毁时结果无人关心
            let _ = tx.send(backend.write_text(&text));
        });
        CopyRequest::Pending
    }

    /// 取出已完成的写入结果，并对每个结果做成功/失败处理。
    pub fn poll(&self, toasts: &mut Toasts) -> Vec<CopyOutcome> {
        self.rx
            .try_iter()
            .map(|res| settle(res, toasts))
            .collect()
    }
}

fn settle(res: Result<(), ClipboardError>, toasts: &mut Toasts) -> CopyOutcome {
    match res {
        Ok(()) => {
            toasts.show(COPIED_MESSAGE, None);
            CopyOutcome::Copied
        }
        Err(err) => {
            tracing::error!("复制失败: {}", err);
            CopyOutcome::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
        time::Duration,
    };

    struct FakeClipboard {
        available: bool,
        fail: bool,
        written: Mutex<Vec<String>>,
    }

    impl FakeClipboard {
        fn new(available: bool, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                available,
                fail,
                written: Mutex::new(Vec::new()),
            })
        }
    }

    impl ClipboardBackend for FakeClipboard {
        fn is_available(&self) -> bool {
            self.available
        }

        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Write("denied".into()));
            }
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn wait_one(helper: &ClipboardHelper, toasts: &mut Toasts) -> CopyOutcome {
        let res = helper
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("clipboard worker did not report");
        settle(res, toasts)
    }

    #[derive(Clone, Default)]
    struct LogBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn successful_copy_shows_one_confirmation_toast() {
        let fake = FakeClipboard::new(true, false);
        let helper = ClipboardHelper::new(fake.clone());
        let mut toasts = Toasts::default();

        assert_eq!(helper.copy("第1题题干"), CopyRequest::Pending);
        assert_eq!(wait_one(&helper, &mut toasts), CopyOutcome::Copied);

        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.visible()[0].message(), COPIED_MESSAGE);
        assert_eq!(*fake.written.lock().unwrap(), vec!["第1题题干".to_string()]);
    }

    #[test]
    fn failed_copy_logs_once_and_shows_no_toast() {
        let buf = LogBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();

        let helper = ClipboardHelper::new(FakeClipboard::new(true, true));
        let mut toasts = Toasts::default();
        let outcome = tracing::subscriber::with_default(subscriber, || {
            assert_eq!(helper.copy("x"), CopyRequest::Pending);
            wait_one(&helper, &mut toasts)
        });

        assert!(matches!(outcome, CopyOutcome::Failed(ClipboardError::Write(_))));
        assert!(toasts.is_empty());
        let logged = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logged.matches("复制失败").count(), 1);
    }

    #[test]
    fn unavailable_clipboard_does_nothing() {
        let fake = FakeClipboard::new(false, false);
        let helper = ClipboardHelper::new(fake.clone());
        let mut toasts = Toasts::default();

        assert_eq!(helper.copy("x"), CopyRequest::Unavailable);
        assert!(helper.poll(&mut toasts).is_empty());
        assert!(toasts.is_empty());
        assert!(fake.written.lock().unwrap().is_empty());
    }

    #[test]
    fn poll_drains_completed_writes() {
        let helper = ClipboardHelper::new(FakeClipboard::new(true, false));
        let mut toasts = Toasts::default();
        helper.copy("a");
        helper.copy("b");
        let mut outcomes = Vec::new();
        for _ in 0..500 {
            outcomes.extend(helper.poll(&mut toasts));
            if outcomes.len() == 2 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(outcomes, vec![CopyOutcome::Copied, CopyOutcome::Copied]);
        assert_eq!(toasts.len(), 2);
    }
}
