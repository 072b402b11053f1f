//! View filters over the task collection.
//!
//! The three dimensions compose by logical AND; `None` is the "All" sentinel
//! that disables a dimension. Filtering borrows the collection and never
//! mutates it.

use crate::fields::{Priority, Status};
use crate::task::Task;

/// A composable view restriction over tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive title substring match. Empty matches everything.
    pub text: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    /// Whether any dimension is active.
    pub fn is_active(&self) -> bool {
        !self.text.is_empty() || self.status.is_some() || self.priority.is_some()
    }

    /// Whether a single task passes every active dimension.
    pub fn matches(&self, task: &Task) -> bool {
        if !self.text.is_empty()
            && !task.title.to_lowercase().contains(&self.text.to_lowercase())
        {
            return false;
        }
        if let Some(s) = self.status {
            if task.status != s {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }
        true
    }

    /// Clone the matching tasks, preserving input order.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, title: &str, status: Status, priority: Priority) -> Task {
        Task {
            id,
            title: title.to_string(),
            status,
            priority,
            revenue: 0.0,
            time_taken: 1.0,
            created_at_utc: 0,
            completed_at_utc: None,
        }
    }

    #[test]
    fn text_match_is_case_insensitive_substring() {
        let tasks = [
            task(1, "Quarterly Review", Status::Todo, Priority::Low),
            task(2, "Cold calls", Status::Todo, Priority::Low),
        ];
        let filter = TaskFilter {
            text: "review".to_string(),
            ..TaskFilter::default()
        };
        let out = filter.apply(&tasks);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn dimensions_compose_by_and() {
        let tasks = [
            task(1, "a", Status::Done, Priority::High),
            task(2, "b", Status::Done, Priority::Low),
            task(3, "c", Status::Todo, Priority::High),
        ];
        let filter = TaskFilter {
            status: Some(Status::Done),
            priority: Some(Priority::High),
            ..TaskFilter::default()
        };
        let out = filter.apply(&tasks);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn default_filter_matches_everything() {
        let tasks = [
            task(1, "a", Status::Done, Priority::High),
            task(2, "b", Status::InProgress, Priority::Low),
        ];
        let filter = TaskFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&tasks).len(), 2);
    }

    #[test]
    fn apply_does_not_mutate_source() {
        let tasks = [
            task(1, "a", Status::Done, Priority::High),
            task(2, "b", Status::Todo, Priority::Low),
        ];
        let filter = TaskFilter {
            status: Some(Status::Done),
            ..TaskFilter::default()
        };
        let _ = filter.apply(&tasks);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].status, Status::Todo);
    }
}
