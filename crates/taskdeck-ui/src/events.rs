//! Events the host document sends to the controller.

use taskdeck_services::TaskDraft;

use crate::state::Filter;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Page ready: fetch the full list.
    Ready,
    /// Create form submitted.
    SubmitCreate(TaskDraft),
    /// Edit form submitted.
    SubmitEdit { id: i64, draft: TaskDraft },
    /// Edit button on a card.
    EditRequested(i64),
    /// Delete button on a card.
    DeleteRequested(i64),
    /// Filter control clicked.
    FilterSelected(Filter),
    /// Close button or backdrop of the edit form.
    CloseEditForm,
}

impl UiEvent {
    /// Translate a card button's `data-action` / `data-task-id` pair.
    pub fn from_card_action(action: &str, task_id: &str) -> Option<Self> {
        let id = task_id.trim().parse::<i64>().ok()?;
        match action {
            "edit" => Some(UiEvent::EditRequested(id)),
            "delete" => Some(UiEvent::DeleteRequested(id)),
            _ => None,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Ready => "ready",
            UiEvent::SubmitCreate(_) => "submit_create",
            UiEvent::SubmitEdit { .. } => "submit_edit",
            UiEvent::EditRequested(_) => "edit_requested",
            UiEvent::DeleteRequested(_) => "delete_requested",
            UiEvent::FilterSelected(_) => "filter_selected",
            UiEvent::CloseEditForm => "close_edit_form",
        }
    }
}
