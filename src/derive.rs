//! Per-task derived fields and the canonical ordering over them.
//!
//! Derived values are never stored; they are recomputed from the task record
//! whenever the collection or the active filter changes.

use crate::fields::Status;
use crate::task::Task;

/// A task together with its computed performance fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTask {
    pub task: Task,
    /// Revenue per hour invested. Total because the store guarantees
    /// `time_taken > 0`.
    pub roi: f64,
    /// Whether the task counts towards completed-work efficiency.
    pub done: bool,
}

/// Compute the derived fields for a single task. Pure and total.
pub fn derive_task(task: &Task) -> DerivedTask {
    DerivedTask {
        roi: task.revenue / task.time_taken,
        done: task.status == Status::Done,
        task: task.clone(),
    }
}

/// Derive every task in the slice, preserving input order.
pub fn derive_all(tasks: &[Task]) -> Vec<DerivedTask> {
    tasks.iter().map(derive_task).collect()
}

/// Order derived tasks by ROI descending. Ties keep their original relative
/// order (`sort_by` is stable), so equal-ROI tasks appear in insertion order.
/// Returns a new vector; the input is untouched.
pub fn sort_derived(derived: &[DerivedTask]) -> Vec<DerivedTask> {
    let mut sorted = derived.to_vec();
    sorted.sort_by(|a, b| b.roi.total_cmp(&a.roi));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    fn task(id: u64, title: &str, revenue: f64, time_taken: f64) -> Task {
        Task {
            id,
            title: title.to_string(),
            status: Status::Todo,
            priority: Priority::Medium,
            revenue,
            time_taken,
            created_at_utc: 0,
            completed_at_utc: None,
        }
    }

    #[test]
    fn roi_is_revenue_over_time() {
        let d = derive_task(&task(1, "t", 300.0, 4.0));
        assert_eq!(d.roi, 75.0);
        assert!(!d.done);
    }

    #[test]
    fn done_flag_tracks_status() {
        let mut t = task(1, "t", 10.0, 1.0);
        t.status = Status::Done;
        assert!(derive_task(&t).done);
    }

    #[test]
    fn sort_orders_by_roi_descending() {
        let derived = derive_all(&[
            task(1, "low", 10.0, 2.0),
            task(2, "high", 500.0, 2.0),
            task(3, "mid", 100.0, 2.0),
        ]);
        let sorted = sort_derived(&derived);
        let ids: Vec<u64> = sorted.iter().map(|d| d.task.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn sort_is_stable_on_roi_ties() {
        let derived = derive_all(&[
            task(10, "first", 100.0, 2.0),
            task(11, "second", 50.0, 1.0),
            task(12, "third", 200.0, 4.0),
        ]);
        // All three have ROI 50; insertion order must survive.
        let sorted = sort_derived(&derived);
        let ids: Vec<u64> = sorted.iter().map(|d| d.task.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let derived = derive_all(&[task(1, "a", 10.0, 2.0), task(2, "b", 500.0, 2.0)]);
        let before: Vec<u64> = derived.iter().map(|d| d.task.id).collect();
        let _ = sort_derived(&derived);
        let after: Vec<u64> = derived.iter().map(|d| d.task.id).collect();
        assert_eq!(before, after);
    }
}
