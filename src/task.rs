//! Task data structure and the input shapes used to mutate it.
//!
//! This module defines the core `Task` struct that represents a single sales
//! work item, plus `TaskPayload` (the sanitised-on-entry input for adds) and
//! `TaskPatch` (the partial field set applied by updates).

use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Status};

/// A sales work item with revenue and time-tracking fields.
///
/// `created_at_utc` is stamped once at creation and never changes.
/// `completed_at_utc` is stamped the first time the task transitions into
/// `Done` and is never cleared or overwritten afterwards, even if the task
/// is reopened and completed again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub revenue: f64,
    pub time_taken: f64,
    pub created_at_utc: i64,
    #[serde(default)]
    pub completed_at_utc: Option<i64>,
}

/// Input for creating a task. Carries every caller-settable field;
/// timestamps are stamped by the store. `id` may be supplied for
/// idempotent replays, otherwise the store assigns one.
#[derive(Debug, Clone)]
pub struct TaskPayload {
    pub id: Option<u64>,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub revenue: f64,
    pub time_taken: f64,
}

/// Partial field set for updating a task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub revenue: Option<f64>,
    pub time_taken: Option<f64>,
}
