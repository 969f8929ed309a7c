//! HTML projection of the visible task list.
//!
//! Every piece of task data that lands in markup goes through
//! `html_escape`, including the raw priority/status strings used in class
//! names, since the server may send values outside the known sets.

use taskdeck_services::{Priority, Task, TaskStatus};

/// Placeholder shown when a task has no description.
pub const NO_DESCRIPTION: &str = "No description";

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedView {
    /// Nothing matches the filter: hide the grid, show the empty-state indicator.
    Empty,
    /// Grid markup for the visible cards.
    Grid(String),
}

impl RenderedView {
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderedView::Empty)
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn priority_icon(priority: &Priority) -> &'static str {
    match priority {
        Priority::Low => "🟢",
        Priority::Medium => "🟡",
        Priority::High => "🔴",
        Priority::Other(_) => "⚪",
    }
}

pub fn status_icon(status: &TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "⏳",
        TaskStatus::InProgress => "🔄",
        TaskStatus::Completed => "✅",
        TaskStatus::Other(_) => "📋",
    }
}

/// Human label for a status: `in_progress` -> `In Progress`.
///
/// Only the first underscore becomes a space; every letter that starts a
/// word is upper-cased.
pub fn format_status(status: &TaskStatus) -> String {
    let spaced = status.as_str().replacen('_', " ", 1);
    let mut out = String::with_capacity(spaced.len());
    let mut prev_is_word = false;
    for c in spaced.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

/// Markup for one card. `index` drives the staggered entrance animation.
pub fn render_card(index: usize, task: &Task) -> String {
    let mut html = String::new();
    let id = task.id.to_string();
    let priority = html_escape(task.priority.as_str());
    let status = html_escape(task.status.as_str());

    html.push_str("<div class=\"task-card\" style=\"animation-delay: ");
    html.push_str(&format!("{:.1}s", index as f64 * 0.1));
    html.push_str("\" data-task-id=\"");
    html.push_str(&id);
    html.push_str("\">");

    html.push_str("<div class=\"task-header\"><div>");
    html.push_str("<h3 class=\"task-title\">");
    html.push_str(&html_escape(&task.title));
    html.push_str("</h3>");
    html.push_str("<p class=\"task-description\">");
    html.push_str(&html_escape(task.description_text().unwrap_or(NO_DESCRIPTION)));
    html.push_str("</p>");
    html.push_str("</div></div>");

    html.push_str("<div class=\"task-meta\">");
    html.push_str("<span class=\"task-badge priority-");
    html.push_str(&priority);
    html.push_str("\">");
    html.push_str(priority_icon(&task.priority));
    html.push(' ');
    html.push_str(&priority);
    html.push_str("</span>");
    html.push_str("<span class=\"task-badge status-");
    html.push_str(&status);
    html.push_str("\">");
    html.push_str(status_icon(&task.status));
    html.push(' ');
    html.push_str(&html_escape(&format_status(&task.status)));
    html.push_str("</span>");
    html.push_str("</div>");

    html.push_str("<div class=\"task-actions\">");
    html.push_str("<button class=\"btn-icon btn-edit\" data-action=\"edit\" data-task-id=\"");
    html.push_str(&id);
    html.push_str("\" title=\"Edit\">✏️</button>");
    html.push_str("<button class=\"btn-icon btn-delete\" data-action=\"delete\" data-task-id=\"");
    html.push_str(&id);
    html.push_str("\" title=\"Delete\">🗑️</button>");
    html.push_str("</div>");

    html.push_str("</div>");
    html
}

/// Render the visible subset.
pub fn render_tasks(visible: &[&Task]) -> RenderedView {
    if visible.is_empty() {
        return RenderedView::Empty;
    }

    let html = visible
        .iter()
        .enumerate()
        .map(|(index, task)| render_card(index, task))
        .collect::<String>();
    RenderedView::Grid(html)
}
