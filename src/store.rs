//! The canonical task collection and the single-slot undo protocol.
//!
//! `TaskStore` owns the in-memory task list for the lifetime of the process.
//! Mutations never fail: invalid inputs are sanitised (`time_taken` coerced
//! to a positive value, negative revenue clamped to zero) and unknown ids are
//! no-ops. Deleting a task parks it in a one-deep undo slot; a second delete
//! overwrites the slot and the first record is gone for good.

use chrono::Utc;

use crate::fields::Status;
use crate::task::{Task, TaskPatch, TaskPayload};

/// Injectable time source so tests can supply fixed timestamps.
pub trait Clock {
    /// Current time as epoch seconds UTC.
    fn now_utc(&self) -> i64;
}

/// Wall-clock time via chrono.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// In-memory store for tasks plus the most recently deleted record.
pub struct TaskStore {
    tasks: Vec<Task>,
    last_deleted: Option<Task>,
    /// Highest id ever handed out or hydrated. Never decreases on delete,
    /// so an id freed by delete cannot be reissued while an undo could
    /// still bring the old record back.
    high_water: u64,
    clock: Box<dyn Clock>,
}

impl TaskStore {
    /// Create an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Create an empty store with an explicit clock.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        TaskStore {
            tasks: Vec::new(),
            last_deleted: None,
            high_water: 0,
            clock,
        }
    }

    /// Create a store pre-populated with hydrated tasks.
    ///
    /// Hydrated records pass through the same sanitisation as `add`, and a
    /// record whose id is already taken is dropped; external data must not
    /// be able to break the collection invariants.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        for task in tasks {
            let task = sanitise_task(task);
            if store.tasks.iter().any(|t| t.id == task.id) {
                continue;
            }
            store.high_water = store.high_water.max(task.id);
            store.tasks.push(task);
        }
        store
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The record currently parked in the undo slot, if any.
    pub fn last_deleted(&self) -> Option<&Task> {
        self.last_deleted.as_ref()
    }

    /// Generate the next task ID. Ids are never reused, even after the task
    /// holding the current maximum is deleted; otherwise a delete of the
    /// highest id followed by an add and an undo would leave two live tasks
    /// sharing one id.
    pub fn next_id(&self) -> u64 {
        self.high_water + 1
    }

    /// Add a task. Returns the assigned ID.
    ///
    /// Inputs are sanitised rather than rejected. `completed_at_utc` is
    /// stamped now iff the task is born `Done`. A caller-supplied id that is
    /// already live is an idempotent replay: nothing is appended.
    pub fn add(&mut self, payload: TaskPayload) -> u64 {
        let now = self.clock.now_utc();
        let id = payload.id.unwrap_or_else(|| self.next_id());
        if self.get(id).is_some() {
            return id;
        }
        self.high_water = self.high_water.max(id);
        let task = Task {
            id,
            title: payload.title,
            status: payload.status,
            priority: payload.priority,
            revenue: sanitise_revenue(payload.revenue),
            time_taken: coerce_time_taken(payload.time_taken),
            created_at_utc: now,
            completed_at_utc: if payload.status == Status::Done {
                Some(now)
            } else {
                None
            },
        };
        self.tasks.push(task);
        id
    }

    /// Merge a patch onto an existing task. Returns false for unknown ids.
    ///
    /// The first transition into `Done` stamps `completed_at_utc`; every
    /// other status change leaves it untouched.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> bool {
        let now = self.clock.now_utc();
        let Some(t) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        let was_done = t.status == Status::Done;
        if let Some(title) = patch.title {
            t.title = title;
        }
        if let Some(status) = patch.status {
            t.status = status;
        }
        if let Some(priority) = patch.priority {
            t.priority = priority;
        }
        if let Some(revenue) = patch.revenue {
            t.revenue = sanitise_revenue(revenue);
        }
        if let Some(time_taken) = patch.time_taken {
            t.time_taken = coerce_time_taken(time_taken);
        }
        if !was_done && t.status == Status::Done && t.completed_at_utc.is_none() {
            t.completed_at_utc = Some(now);
        }
        true
    }

    /// Remove a task, parking it in the undo slot. Returns the removed
    /// record's title for reporting, or `None` if the id was unknown.
    ///
    /// A delete while the slot is occupied discards the previous occupant
    /// permanently. Deleting an unknown id leaves the slot alone.
    pub fn delete(&mut self, id: u64) -> Option<String> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(idx);
        let title = removed.title.clone();
        self.last_deleted = Some(removed);
        Some(title)
    }

    /// Reinsert the record from the undo slot and empty it. The record is
    /// appended, not restored to its original position. Returns the
    /// reinserted id, or `None` when the slot was empty.
    pub fn undo_delete(&mut self) -> Option<u64> {
        let task = self.last_deleted.take()?;
        let id = task.id;
        self.tasks.push(task);
        Some(id)
    }

    /// Empty the undo slot without reinserting. Used when the user dismisses
    /// the undo notice; must not resurrect the record.
    pub fn clear_last_deleted(&mut self) {
        self.last_deleted = None;
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the field coercions to a full record. Used for hydrated data,
/// which arrives without having gone through `add`.
pub(crate) fn sanitise_task(mut task: Task) -> Task {
    task.time_taken = coerce_time_taken(task.time_taken);
    task.revenue = sanitise_revenue(task.revenue);
    task
}

/// `time_taken` must stay strictly positive; anything else becomes 1 hour.
fn coerce_time_taken(hours: f64) -> f64 {
    if hours > 0.0 {
        hours
    } else {
        1.0
    }
}

/// Revenue is non-negative; negatives (and NaN) clamp to zero.
fn sanitise_revenue(revenue: f64) -> f64 {
    if revenue > 0.0 {
        revenue
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_utc(&self) -> i64 {
            self.0
        }
    }

    fn payload(title: &str, status: Status) -> TaskPayload {
        TaskPayload {
            id: None,
            title: title.to_string(),
            status,
            priority: Priority::Medium,
            revenue: 100.0,
            time_taken: 2.0,
        }
    }

    fn store_at(ts: i64) -> TaskStore {
        TaskStore::with_clock(Box::new(FixedClock(ts)))
    }

    #[test]
    fn add_sanitises_time_taken() {
        let mut store = store_at(1_000);
        let id = store.add(TaskPayload {
            time_taken: 0.0,
            ..payload("Zero hours", Status::Todo)
        });
        assert_eq!(store.get(id).unwrap().time_taken, 1.0);

        let id = store.add(TaskPayload {
            time_taken: -3.5,
            ..payload("Negative hours", Status::Todo)
        });
        assert_eq!(store.get(id).unwrap().time_taken, 1.0);
    }

    #[test]
    fn update_sanitises_time_taken() {
        let mut store = store_at(1_000);
        let id = store.add(payload("Call client", Status::Todo));
        store.update(
            id,
            TaskPatch {
                time_taken: Some(-1.0),
                ..TaskPatch::default()
            },
        );
        assert_eq!(store.get(id).unwrap().time_taken, 1.0);
    }

    #[test]
    fn add_clamps_negative_revenue() {
        let mut store = store_at(1_000);
        let id = store.add(TaskPayload {
            revenue: -500.0,
            ..payload("Refund", Status::Todo)
        });
        assert_eq!(store.get(id).unwrap().revenue, 0.0);
    }

    #[test]
    fn add_stamps_completed_at_only_when_born_done() {
        let mut store = store_at(7_777);
        let open = store.add(payload("Open", Status::Todo));
        let done = store.add(payload("Closed", Status::Done));
        assert_eq!(store.get(open).unwrap().completed_at_utc, None);
        assert_eq!(store.get(done).unwrap().completed_at_utc, Some(7_777));
        assert_eq!(store.get(done).unwrap().created_at_utc, 7_777);
    }

    #[test]
    fn completed_at_is_write_once() {
        let mut store = store_at(100);
        let id = store.add(payload("Deal", Status::Todo));

        store.update(
            id,
            TaskPatch {
                status: Some(Status::Done),
                ..TaskPatch::default()
            },
        );
        assert_eq!(store.get(id).unwrap().completed_at_utc, Some(100));

        // Reopen, then complete again; the original stamp survives both.
        store.update(
            id,
            TaskPatch {
                status: Some(Status::Todo),
                ..TaskPatch::default()
            },
        );
        assert_eq!(store.get(id).unwrap().completed_at_utc, Some(100));

        store.update(
            id,
            TaskPatch {
                status: Some(Status::Done),
                ..TaskPatch::default()
            },
        );
        assert_eq!(store.get(id).unwrap().completed_at_utc, Some(100));
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut store = store_at(100);
        store.add(payload("Only task", Status::Todo));
        assert!(!store.update(
            999,
            TaskPatch {
                title: Some("Ghost".to_string()),
                ..TaskPatch::default()
            }
        ));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].title, "Only task");
    }

    #[test]
    fn delete_then_undo_restores_identical_record() {
        let mut store = store_at(100);
        let id = store.add(payload("Demo", Status::Done));
        let original = store.get(id).unwrap().clone();

        assert_eq!(store.delete(id), Some("Demo".to_string()));
        assert!(store.get(id).is_none());
        assert!(store.last_deleted().is_some());

        assert_eq!(store.undo_delete(), Some(id));
        assert_eq!(store.get(id), Some(&original));
        assert!(store.last_deleted().is_none());
    }

    #[test]
    fn second_delete_discards_first_permanently() {
        let mut store = store_at(100);
        let a = store.add(payload("First", Status::Todo));
        let b = store.add(payload("Second", Status::Todo));

        store.delete(a);
        store.delete(b);

        assert_eq!(store.undo_delete(), Some(b));
        assert!(store.get(b).is_some());
        assert!(store.get(a).is_none());
        assert_eq!(store.undo_delete(), None);
    }

    #[test]
    fn delete_unknown_id_leaves_slot_alone() {
        let mut store = store_at(100);
        let id = store.add(payload("Keeper", Status::Todo));
        store.delete(id);
        assert!(store.last_deleted().is_some());

        assert_eq!(store.delete(424_242), None);
        assert_eq!(store.last_deleted().unwrap().id, id);
    }

    #[test]
    fn clear_last_deleted_does_not_resurrect() {
        let mut store = store_at(100);
        let id = store.add(payload("Dismissed", Status::Todo));
        store.delete(id);

        store.clear_last_deleted();
        assert!(store.last_deleted().is_none());
        assert!(store.get(id).is_none());
        assert_eq!(store.undo_delete(), None);
    }

    #[test]
    fn undo_appends_rather_than_restoring_position() {
        let mut store = store_at(100);
        let a = store.add(payload("A", Status::Todo));
        store.add(payload("B", Status::Todo));
        store.add(payload("C", Status::Todo));

        store.delete(a);
        store.undo_delete();

        let order: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn caller_supplied_id_is_honoured() {
        let mut store = store_at(100);
        let id = store.add(TaskPayload {
            id: Some(77),
            ..payload("Replayed", Status::Todo)
        });
        assert_eq!(id, 77);
        assert_eq!(store.next_id(), 78);
    }

    #[test]
    fn replaying_a_live_id_does_not_duplicate() {
        let mut store = store_at(100);
        store.add(TaskPayload {
            id: Some(5),
            ..payload("Original", Status::Todo)
        });
        let id = store.add(TaskPayload {
            id: Some(5),
            ..payload("Replay", Status::Todo)
        });
        assert_eq!(id, 5);
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.get(5).unwrap().title, "Original");
    }

    #[test]
    fn ids_stay_unique_across_delete_add_undo() {
        let mut store = store_at(100);
        let a = store.add(payload("A", Status::Todo));
        store.delete(a);

        // The freed id must not be reissued while the undo slot could
        // still bring the old record back.
        let b = store.add(payload("B", Status::Todo));
        assert_ne!(a, b);

        store.undo_delete();
        let mut ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), store.tasks().len());
    }

    #[test]
    fn hydrated_tasks_are_sanitised() {
        let mut bad = Task {
            id: 1,
            title: "Zero hours".to_string(),
            status: Status::Todo,
            priority: Priority::Low,
            revenue: -50.0,
            time_taken: 0.0,
            created_at_utc: 0,
            completed_at_utc: None,
        };
        let store = TaskStore::with_tasks(vec![bad.clone()]);
        let t = store.get(1).unwrap();
        assert_eq!(t.time_taken, 1.0);
        assert_eq!(t.revenue, 0.0);

        // A repeated id is dropped rather than creating a duplicate.
        bad.title = "Duplicate".to_string();
        let store = TaskStore::with_tasks(vec![
            Task {
                id: 1,
                title: "First".to_string(),
                status: Status::Todo,
                priority: Priority::Low,
                revenue: 10.0,
                time_taken: 1.0,
                created_at_utc: 0,
                completed_at_utc: None,
            },
            bad,
        ]);
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.get(1).unwrap().title, "First");
    }

    #[test]
    fn hydration_seeds_the_id_allocator() {
        let tasks = vec![
            Task {
                id: 3,
                title: "a".to_string(),
                status: Status::Todo,
                priority: Priority::Low,
                revenue: 10.0,
                time_taken: 1.0,
                created_at_utc: 0,
                completed_at_utc: None,
            },
            Task {
                id: 7,
                title: "b".to_string(),
                status: Status::Todo,
                priority: Priority::Low,
                revenue: 10.0,
                time_taken: 1.0,
                created_at_utc: 0,
                completed_at_utc: None,
            },
        ];
        let mut store = TaskStore::with_tasks(tasks);
        assert_eq!(store.next_id(), 8);

        // Deleting the highest id must not roll the allocator back.
        store.delete(7);
        assert_eq!(store.next_id(), 8);
    }
}
