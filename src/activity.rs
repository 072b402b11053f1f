//! Session activity log.
//!
//! Every successful add/update/delete/undo emits one immutable entry. Entries
//! are prepended so the newest is always first, and the log keeps only the 50
//! most recent; older entries drop off silently.

/// Maximum number of entries retained.
pub const ACTIVITY_LOG_CAP: usize = 50;

/// The mutation that produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Add,
    Update,
    Delete,
    Undo,
}

/// One immutable record of a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub id: u64,
    pub timestamp_utc: i64,
    pub kind: ActivityKind,
    pub summary: String,
}

/// Newest-first, bounded log of mutations for the current session.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
    next_id: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// Prepend an entry, dropping the oldest beyond the cap.
    pub fn record(&mut self, timestamp_utc: i64, kind: ActivityKind, summary: String) {
        self.next_id += 1;
        self.entries.insert(
            0,
            ActivityEntry {
                id: self.next_id,
                timestamp_utc,
                kind,
                summary,
            },
        );
        self.entries.truncate(ACTIVITY_LOG_CAP);
    }
}

/// Display label for an activity kind.
pub fn format_activity_kind(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Add => "add",
        ActivityKind::Update => "update",
        ActivityKind::Delete => "delete",
        ActivityKind::Undo => "undo",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_is_first() {
        let mut log = ActivityLog::new();
        log.record(1, ActivityKind::Add, "Added A".to_string());
        log.record(2, ActivityKind::Delete, "Deleted A".to_string());

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, ActivityKind::Delete);
        assert_eq!(entries[1].kind, ActivityKind::Add);
    }

    #[test]
    fn entries_get_unique_ids() {
        let mut log = ActivityLog::new();
        log.record(1, ActivityKind::Add, "a".to_string());
        log.record(1, ActivityKind::Add, "b".to_string());
        assert_ne!(log.entries()[0].id, log.entries()[1].id);
    }

    #[test]
    fn cap_drops_oldest_silently() {
        let mut log = ActivityLog::new();
        for i in 0..(ACTIVITY_LOG_CAP + 10) {
            log.record(i as i64, ActivityKind::Update, format!("entry {i}"));
        }
        assert_eq!(log.entries().len(), ACTIVITY_LOG_CAP);
        // Newest survives at the front, the first ten entries are gone.
        assert_eq!(log.entries()[0].summary, "entry 59");
        assert_eq!(
            log.entries().last().unwrap().summary,
            format!("entry {}", 10)
        );
    }
}
