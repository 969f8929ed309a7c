//! In-memory task list and the current filter.

use std::collections::HashSet;
use std::str::FromStr;

use taskdeck_services::{Task, TaskStatus};
use thiserror::Error;

/// Client-side view selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl Filter {
    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Pending => "pending",
            Filter::InProgress => "in_progress",
            Filter::Completed => "completed",
        }
    }

    /// Get all filter variants, in display order
    pub fn all() -> &'static [Filter] {
        &[
            Filter::All,
            Filter::Pending,
            Filter::InProgress,
            Filter::Completed,
        ]
    }

    /// True if a task with `status` is visible under this filter.
    pub fn matches(self, status: &TaskStatus) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => *status == TaskStatus::Pending,
            Filter::InProgress => *status == TaskStatus::InProgress,
            Filter::Completed => *status == TaskStatus::Completed,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Aggregate counters over the whole (unfiltered) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Task list plus the active filter, owned by one controller.
#[derive(Debug, Default)]
pub struct TaskListState {
    tasks: Vec<Task>,
    filter: Filter,
}

impl TaskListState {
    pub fn new(filter: Filter) -> Self {
        Self {
            tasks: Vec::new(),
            filter,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the whole list with the server's collection.
    ///
    /// Later duplicates of an id are dropped so ids stay unique.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::with_capacity(tasks.len());
        let before = tasks.len();
        self.tasks = tasks.into_iter().filter(|t| seen.insert(t.id)).collect();
        if self.tasks.len() != before {
            tracing::warn!(
                "Dropped {} tasks with duplicate ids from server response",
                before - self.tasks.len()
            );
        }
    }

    /// Insert a freshly created task at the front.
    ///
    /// An entry already holding the same id (e.g. from an overlapping load)
    /// is removed first.
    pub fn prepend(&mut self, task: Task) {
        self.tasks.retain(|t| t.id != task.id);
        self.tasks.insert(0, task);
    }

    /// Replace the entry with the same id in place. Returns false if absent.
    pub fn replace(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `id`. Returns false if absent.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Tasks shown under the current filter, in list order.
    pub fn visible(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.filter.matches(&t.status))
            .collect()
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts {
            total: self.tasks.len(),
            completed: self
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            pending: self
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Pending)
                .count(),
        }
    }
}
