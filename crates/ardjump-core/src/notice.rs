use serde::{Deserialize, Serialize};

/// Maximum number of simultaneously visible notices.
pub const MAX_VISIBLE_NOTICES: usize = 3;

/// Default display duration for a notice in milliseconds.
pub const DEFAULT_NOTICE_DURATION_MS: u32 = 3000;

/// Display category, picked up by the notification collaborator for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A fire-and-forget display request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub duration_ms: u32,
}

impl Notice {
    pub fn new(message: impl Into<String>, kind: NoticeKind, duration_ms: u32) -> Self {
        Self {
            message: message.into(),
            kind,
            duration_ms,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Info, DEFAULT_NOTICE_DURATION_MS)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Success, DEFAULT_NOTICE_DURATION_MS)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Warning, DEFAULT_NOTICE_DURATION_MS)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Error, DEFAULT_NOTICE_DURATION_MS)
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// A notice on screen together with its remaining lifetime.
#[derive(Debug, Clone)]
pub struct ShownNotice {
    pub notice: Notice,
    pub remaining_ms: f64,
}

/// Display-side queue: at most [`MAX_VISIBLE_NOTICES`] are shown, the rest
/// wait in emission order.
pub struct NoticeQueue {
    visible: Vec<ShownNotice>,
    pending: Vec<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self {
            visible: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Add a new notice to the queue.
    pub fn push(&mut self, notice: Notice) {
        if self.visible.len() < MAX_VISIBLE_NOTICES {
            self.visible.push(ShownNotice {
                remaining_ms: f64::from(notice.duration_ms),
                notice,
            });
        } else {
            self.pending.push(notice);
        }
    }

    /// Age visible notices, drop expired ones and promote pending ones.
    pub fn tick(&mut self, dt_ms: f64) {
        for shown in &mut self.visible {
            shown.remaining_ms -= dt_ms;
        }
        self.visible.retain(|s| s.remaining_ms > 0.0);
        while self.visible.len() < MAX_VISIBLE_NOTICES && !self.pending.is_empty() {
            let notice = self.pending.remove(0);
            self.visible.push(ShownNotice {
                remaining_ms: f64::from(notice.duration_ms),
                notice,
            });
        }
    }

    /// Get currently visible notices.
    pub fn visible(&self) -> &[ShownNotice] {
        &self.visible
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new()
    }
}
