/// User-facing status surface: the activity log and the progress bar

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Marker shown next to a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Neutral,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
    pub at: DateTime<Local>,
}

/// Reverse-chronological activity log (newest entry first)
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    entries: VecDeque<LogEntry>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            LogKind::Error => tracing::warn!("{message}"),
            _ => tracing::info!("{message}"),
        }
        self.entries.push_front(LogEntry {
            kind,
            message,
            at: Local::now(),
        });
    }

    pub fn neutral(&mut self, message: impl Into<String>) {
        self.push(LogKind::Neutral, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(LogKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogKind::Error, message);
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Coarse progress indicator, 0 to 100
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress(u8);

impl Progress {
    pub fn set(&mut self, percent: u8) {
        self.0 = percent.min(100);
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_entry_first() {
        let mut log = StatusLog::new();
        log.neutral("first");
        log.success("second");
        log.error("third");

        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["third", "second", "first"]);
        assert_eq!(log.latest().unwrap().kind, LogKind::Error);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut progress = Progress::default();
        progress.set(30);
        assert_eq!(progress.percent(), 30);
        progress.set(250);
        assert_eq!(progress.percent(), 100);
        progress.reset();
        assert_eq!(progress.percent(), 0);
    }
}
