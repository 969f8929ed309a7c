//! Host surface the controller drives.
//!
//! The host document (browser page, terminal, test double) implements
//! `TaskView`; the controller never assumes anything about presentation
//! beyond these calls.

use taskdeck_services::{Priority, Task, TaskStatus};

use crate::state::Filter;

/// One of the three summary counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Total,
    Completed,
    Pending,
}

impl Counter {
    /// Stable element id the counter binds to in the host document.
    pub fn element_id(self) -> &'static str {
        match self {
            Counter::Total => "totalTasks",
            Counter::Completed => "completedTasks",
            Counter::Pending => "pendingTasks",
        }
    }

    pub fn all() -> &'static [Counter] {
        &[Counter::Total, Counter::Completed, Counter::Pending]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

/// Values used to pre-fill the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl From<&Task> for EditForm {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority.clone(),
            status: task.status.clone(),
        }
    }
}

/// Elements of the host document bound by the controller.
///
/// Calls may come from timer tasks on other threads, hence `Send + Sync`.
pub trait TaskView: Send + Sync {
    /// Show the grid with `html` as its content and hide the empty state.
    fn show_grid(&self, html: &str);

    /// Hide the grid and show the empty-state indicator.
    fn show_empty_state(&self);

    fn set_counter(&self, counter: Counter, value: i64);

    fn show_notification(&self, message: &str, kind: NotificationKind);

    fn hide_notification(&self);

    fn reset_create_form(&self);

    fn open_edit_form(&self, form: &EditForm);

    fn close_edit_form(&self);

    /// Mark the control for `filter` active and all others inactive.
    fn set_active_filter(&self, filter: Filter);
}

/// Gate for destructive actions.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}
