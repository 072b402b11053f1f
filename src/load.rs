//! Initial hydration of the task collection.
//!
//! The external source is an optional JSON file holding an array of tasks.
//! Anything short of a non-empty, well-formed array (missing file, read
//! error, parse error, wrong shape, empty array) falls back to the generated
//! dataset so the rest of the application always has data to work with. The
//! failure itself is kept as a user-visible message; a populated dataset and
//! an error display are not mutually exclusive.

use std::fs;
use std::path::Path;

use crate::seed::generate_tasks;
use crate::store::sanitise_task;
use crate::task::Task;

/// Result of hydration: the tasks to start with, plus the load failure (if
/// any) that caused a fallback to generated data.
pub struct LoadOutcome {
    pub tasks: Vec<Task>,
    pub error: Option<String>,
}

impl LoadOutcome {
    fn fallback(seed_count: usize, base_ts: i64, error: Option<String>) -> Self {
        LoadOutcome {
            tasks: generate_tasks(seed_count, base_ts),
            error,
        }
    }
}

/// External records get the same field coercions as store mutations, and a
/// record whose id repeats an earlier one is dropped; a task file must not
/// be able to smuggle in a zero-hour task or a duplicate id.
fn sanitise_loaded(tasks: Vec<Task>) -> Vec<Task> {
    let mut out: Vec<Task> = Vec::with_capacity(tasks.len());
    for task in tasks {
        let task = sanitise_task(task);
        if out.iter().any(|t| t.id == task.id) {
            continue;
        }
        out.push(task);
    }
    out
}

/// Load tasks from `path`, falling back to `seed_count` generated tasks.
///
/// `base_ts` anchors the generated dataset's creation times. A `None` path
/// means no source was configured; that is not an error, just a fallback.
pub fn load_tasks(path: Option<&Path>, seed_count: usize, base_ts: i64) -> LoadOutcome {
    let Some(path) = path else {
        return LoadOutcome::fallback(seed_count, base_ts, None);
    };

    let buf = match fs::read_to_string(path) {
        Ok(buf) => buf,
        Err(e) => {
            return LoadOutcome::fallback(
                seed_count,
                base_ts,
                Some(format!("Could not read {}: {e}", path.display())),
            );
        }
    };

    match serde_json::from_str::<Vec<Task>>(&buf) {
        Ok(tasks) if !tasks.is_empty() => LoadOutcome {
            tasks: sanitise_loaded(tasks),
            error: None,
        },
        // An empty array is treated the same as absence.
        Ok(_) => LoadOutcome::fallback(
            seed_count,
            base_ts,
            Some(format!("{} holds no tasks, using sample data", path.display())),
        ),
        Err(e) => LoadOutcome::fallback(
            seed_count,
            base_ts,
            Some(format!("Could not parse {}: {e}", path.display())),
        ),
    }
}
