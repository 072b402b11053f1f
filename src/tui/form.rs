//! Add/edit form state for the dashboard.
//!
//! The form is a fixed sequence of fields: three text inputs (title, revenue,
//! time taken) and two cycled enums (status, priority). Values are parsed
//! leniently on submit; the store sanitises whatever comes out.

use crate::fields::{Priority, Status};
use crate::task::{Task, TaskPatch, TaskPayload};
use crate::tui::input::InputField;

pub const FIELD_TITLE: usize = 0;
pub const FIELD_REVENUE: usize = 1;
pub const FIELD_TIME_TAKEN: usize = 2;
pub const FIELD_STATUS: usize = 3;
pub const FIELD_PRIORITY: usize = 4;
pub const FIELD_COUNT: usize = 5;

/// Form state for creating or editing a task.
pub struct TaskForm {
    pub title: InputField,
    pub revenue: InputField,
    pub time_taken: InputField,
    pub status: Status,
    pub priority: Priority,
    pub active_field: usize,
    /// `Some` when editing an existing task.
    pub editing_id: Option<u64>,
}

impl TaskForm {
    /// Empty form for a new task.
    pub fn new() -> Self {
        TaskForm {
            title: InputField::new(),
            revenue: InputField::new(),
            time_taken: InputField::new(),
            status: Status::Todo,
            priority: Priority::Medium,
            active_field: FIELD_TITLE,
            editing_id: None,
        }
    }

    /// Form pre-filled from an existing task.
    pub fn from_task(task: &Task) -> Self {
        TaskForm {
            title: InputField::with_value(&task.title),
            revenue: InputField::with_value(&format!("{}", task.revenue)),
            time_taken: InputField::with_value(&format!("{}", task.time_taken)),
            status: task.status,
            priority: task.priority,
            active_field: FIELD_TITLE,
            editing_id: Some(task.id),
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = (self.active_field + 1) % FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.active_field = (self.active_field + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// Route a typed character to the active field. Enum fields cycle on
    /// space.
    pub fn handle_char(&mut self, c: char) {
        match self.active_field {
            FIELD_TITLE => self.title.handle_char(c),
            FIELD_REVENUE => {
                if c.is_ascii_digit() || c == '.' {
                    self.revenue.handle_char(c);
                }
            }
            FIELD_TIME_TAKEN => {
                if c.is_ascii_digit() || c == '.' {
                    self.time_taken.handle_char(c);
                }
            }
            FIELD_STATUS => {
                if c == ' ' {
                    self.status = self.status.next();
                }
            }
            FIELD_PRIORITY => {
                if c == ' ' {
                    self.priority = self.priority.next();
                }
            }
            _ => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        match self.active_field {
            FIELD_TITLE => self.title.handle_backspace(),
            FIELD_REVENUE => self.revenue.handle_backspace(),
            FIELD_TIME_TAKEN => self.time_taken.handle_backspace(),
            _ => {}
        }
    }

    /// Build the add payload from the current form values.
    pub fn to_payload(&self) -> TaskPayload {
        TaskPayload {
            id: None,
            title: if self.title.value.trim().is_empty() {
                "Untitled task".to_string()
            } else {
                self.title.value.trim().to_string()
            },
            status: self.status,
            priority: self.priority,
            revenue: self.revenue.value.parse().unwrap_or(0.0),
            time_taken: self.time_taken.value.parse().unwrap_or(1.0),
        }
    }

    /// Build the update patch from the current form values.
    pub fn to_patch(&self) -> TaskPatch {
        let payload = self.to_payload();
        TaskPatch {
            title: Some(payload.title),
            status: Some(payload.status),
            priority: Some(payload.priority),
            revenue: Some(payload.revenue),
            time_taken: Some(payload.time_taken),
        }
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}
