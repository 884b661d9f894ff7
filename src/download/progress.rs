// Progress reporting for downloads

use indicatif::ProgressBar;
use std::sync::Mutex;

use crate::ui;

/// Receives progress events for a single transfer.
///
/// Purely informational: a listener can never affect whether a download
/// succeeds.
pub trait ProgressListener: Send + Sync {
    /// Transfer started; `total` is the Content-Length when the server sent one
    fn on_start(&self, total: Option<u64>);

    /// Cumulative bytes written so far (monotonically increasing)
    fn on_progress(&self, downloaded: u64);

    fn on_complete(&self);

    fn on_failure(&self, message: &str);
}

/// Listener that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressListener for NoopProgress {
    fn on_start(&self, _total: Option<u64>) {}
    fn on_progress(&self, _downloaded: u64) {}
    fn on_complete(&self) {}
    fn on_failure(&self, _message: &str) {}
}

/// Terminal progress bar backed by indicatif
pub struct TerminalProgress {
    name: String,
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl ProgressListener for TerminalProgress {
    fn on_start(&self, total: Option<u64>) {
        let bar = match total {
            Some(size) => ui::download_bar(size),
            None => ui::download_bar_indeterminate(),
        };
        bar.set_message(self.name.clone());
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_progress(&self, downloaded: u64) {
        self.with_bar(|bar| bar.set_position(downloaded));
    }

    fn on_complete(&self) {
        self.with_bar(|bar| ui::finish_download_success(bar, &self.name));
    }

    fn on_failure(&self, message: &str) {
        let name = &self.name;
        self.with_bar(|bar| ui::finish_spinner_error(bar, &format!("{}: {}", name, message)));
    }
}
