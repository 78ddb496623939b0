// User-facing notices (the toasts of the list pages). Every notice is also
// logged, so failures are visible even when nobody drains the queue.
use crate::error::ClientError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{}] {}", tag, self.text)
    }
}

#[derive(Debug, Default)]
pub struct Notices {
    entries: Vec<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!(notice = %text, "Success");
        self.push(NoticeLevel::Success, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!(notice = %text, "Info");
        self.push(NoticeLevel::Info, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::error!(notice = %text, "Error");
        self.push(NoticeLevel::Error, text);
    }

    /// Records `err` with the best message available, `fallback` otherwise.
    pub fn from_error(&mut self, err: &ClientError, fallback: &str) {
        tracing::error!(error = %err, "Operation failed");
        self.push(NoticeLevel::Error, err.user_message(fallback));
    }

    pub fn entries(&self) -> &[Notice] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Notice> {
        self.entries.last()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|n| n.level == NoticeLevel::Error)
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.entries)
    }

    fn push(&mut self, level: NoticeLevel, text: String) {
        self.entries.push(Notice {
            level,
            text,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_uses_backend_message() {
        let mut notices = Notices::new();
        let err = ClientError::ServerError {
            status: 400,
            message: Some("Asset is already scrapped".to_string()),
        };
        notices.from_error(&err, "Failed to save");
        let last = notices.last().unwrap();
        assert_eq!(last.level, NoticeLevel::Error);
        assert_eq!(last.text, "Asset is already scrapped");
        assert!(notices.has_errors());
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut notices = Notices::new();
        notices.success("Saved");
        notices.info("Nothing to do");
        let drained = notices.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].to_string(), "[ok] Saved");
        assert!(notices.entries().is_empty());
        assert!(!notices.has_errors());
    }
}
