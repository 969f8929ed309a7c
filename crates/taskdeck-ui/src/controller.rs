//! Task list controller.
//!
//! Owns the in-memory task list and the active filter, issues CRUD calls to
//! the task API, and re-renders the board after every state change.
//!
//! Handlers take `&self` so several can be in flight at once. The state lock
//! is never held across an `.await`; the list is only touched once a request
//! has completed successfully. Overlapping edits of the same task resolve
//! last-writer-wins.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use taskdeck_core::{Config, MutationState, UiConfig};
use taskdeck_services::{Task, TaskClient, TaskDraft};
use tokio::sync::mpsc;

use crate::counter::CounterAnimator;
use crate::error::TaskError;
use crate::events::UiEvent;
use crate::notify::Notifier;
use crate::render::{self, RenderedView};
use crate::state::{Filter, TaskCounts, TaskListState};
use crate::view::{ConfirmPrompt, Counter, EditForm, NotificationKind, TaskView};

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this task?";

const LOAD_FAILED: &str = "Failed to load tasks";
const CREATE_OK: &str = "Task created successfully!";
const CREATE_FAILED: &str = "Failed to create task";
const UPDATE_OK: &str = "Task updated successfully!";
const UPDATE_FAILED: &str = "Failed to update task";
const DELETE_OK: &str = "Task deleted successfully!";
const DELETE_FAILED: &str = "Failed to delete task";

/// Timing and startup settings.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub counter_animation: Duration,
    pub notification: Duration,
    pub initial_filter: Filter,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            counter_animation: Duration::from_millis(500),
            notification: Duration::from_secs(3),
            initial_filter: Filter::All,
        }
    }
}

impl From<&UiConfig> for ControllerSettings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            counter_animation: Duration::from_millis(ui.counter_animation_ms),
            notification: Duration::from_millis(ui.notification_ms),
            initial_filter: ui.default_filter.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; falling back to 'all'", e);
                Filter::All
            }),
        }
    }
}

/// What happened to a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

/// Tracks one request through `Idle -> Pending -> Applied|Rejected -> Idle`
/// and keeps the controller's in-flight count.
struct Mutation<'a> {
    operation: &'static str,
    state: MutationState,
    in_flight: &'a AtomicUsize,
}

impl<'a> Mutation<'a> {
    fn begin(operation: &'static str, in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        let state = MutationState::Idle.begin();
        tracing::trace!(operation, ?state, "Mutation started");
        Self {
            operation,
            state,
            in_flight,
        }
    }

    fn resolve(&mut self, succeeded: bool) {
        self.state = self.state.resolve(succeeded);
        tracing::trace!(operation = self.operation, state = ?self.state, "Mutation resolved");
    }

    /// Run `f` on the list only once the server has acknowledged the request.
    fn apply<R>(
        &self,
        list: &Mutex<TaskListState>,
        f: impl FnOnce(&mut TaskListState) -> R,
    ) -> Option<R> {
        if self.state.may_mutate() {
            Some(f(&mut list.lock()))
        } else {
            tracing::debug!(operation = self.operation, state = ?self.state, "List left untouched");
            None
        }
    }
}

impl Drop for Mutation<'_> {
    fn drop(&mut self) {
        if self.state.is_pending() {
            tracing::debug!(operation = self.operation, "Mutation dropped before a response arrived");
        }
        self.state = self.state.settle();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct TaskListController {
    client: TaskClient,
    view: Arc<dyn TaskView>,
    prompt: Arc<dyn ConfirmPrompt>,
    state: Mutex<TaskListState>,
    counters: CounterAnimator,
    notifier: Notifier,
    in_flight: AtomicUsize,
}

impl TaskListController {
    pub fn new(
        client: TaskClient,
        view: Arc<dyn TaskView>,
        prompt: Arc<dyn ConfirmPrompt>,
        settings: ControllerSettings,
    ) -> Self {
        view.set_active_filter(settings.initial_filter);
        Self {
            client,
            counters: CounterAnimator::new(view.clone(), settings.counter_animation),
            notifier: Notifier::new(view.clone(), settings.notification),
            state: Mutex::new(TaskListState::new(settings.initial_filter)),
            view,
            prompt,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Build a controller (and its API client) from application config.
    pub fn from_config(
        config: &Config,
        view: Arc<dyn TaskView>,
        prompt: Arc<dyn ConfirmPrompt>,
    ) -> Result<Self, TaskError> {
        let client = TaskClient::with_options(
            &config.services.api_url,
            &config.services.api_prefix,
            config.services.allow_invalid_certs,
        )?;
        Ok(Self::new(
            client,
            view,
            prompt,
            ControllerSettings::from(&config.ui),
        ))
    }

    // =========== Snapshots ===========

    /// Copy of the full (unfiltered) list.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks().to_vec()
    }

    /// Copy of the tasks visible under the current filter.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.state.lock().visible().into_iter().cloned().collect()
    }

    pub fn filter(&self) -> Filter {
        self.state.lock().filter()
    }

    pub fn counts(&self) -> TaskCounts {
        self.state.lock().counts()
    }

    /// Value currently displayed for `counter` (may lag `counts()` mid-animation).
    pub fn displayed_counter(&self, counter: Counter) -> i64 {
        self.counters.displayed(counter)
    }

    /// True while any request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn client(&self) -> &TaskClient {
        &self.client
    }

    // =========== Event dispatch ===========

    /// Route one host event to its handler. Failures are already surfaced
    /// through notifications and logs by the handlers.
    pub async fn dispatch(&self, event: UiEvent) {
        let name = event.name();
        tracing::debug!(event = name, "Dispatching UI event");
        let result = match event {
            UiEvent::Ready => self.load().await,
            UiEvent::SubmitCreate(draft) => self.create(draft).await.map(|_| ()),
            UiEvent::SubmitEdit { id, draft } => self.update(id, draft).await.map(|_| ()),
            UiEvent::EditRequested(id) => {
                self.open_edit(id);
                Ok(())
            }
            UiEvent::DeleteRequested(id) => self.delete(id).await.map(|_| ()),
            UiEvent::FilterSelected(filter) => {
                self.set_filter(filter);
                Ok(())
            }
            UiEvent::CloseEditForm => {
                self.view.close_edit_form();
                Ok(())
            }
        };

        // Already logged and shown to the user by the handler
        if let Err(e) = result {
            tracing::debug!(event = name, kind = ?e.kind(), "UI event finished with an error");
        }
    }

    /// Consume events until the sender side closes.
    ///
    /// Each event runs on its own task, so a slow request does not hold up
    /// filter clicks or other mutations.
    pub async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<UiEvent>) {
        tracing::info!("Task board event loop started");
        let mut handlers = Vec::new();
        while let Some(event) = events.recv().await {
            let controller = self.clone();
            handlers.push(tokio::spawn(async move { controller.dispatch(event).await }));
            handlers.retain(|h| !h.is_finished());
        }
        for handle in handlers {
            if let Err(e) = handle.await {
                tracing::error!("Event handler panicked: {}", e);
            }
        }
        tracing::info!("Task board event loop stopped");
    }

    // =========== Handlers ===========

    /// Replace the list with the server's collection.
    pub async fn load(&self) -> Result<(), TaskError> {
        let mut mutation = Mutation::begin("load", &self.in_flight);
        let result = self.client.list_tasks().await;
        mutation.resolve(result.is_ok());

        match result {
            Ok(tasks) => {
                tracing::info!("Loaded {} tasks", tasks.len());
                mutation.apply(&self.state, |list| list.replace_all(tasks));
                self.render();
                self.refresh_counters();
                Ok(())
            }
            Err(e) => Err(self.reject("load", e.into(), LOAD_FAILED)),
        }
    }

    /// Create a task and put the server's record first in the list.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task, TaskError> {
        let mut mutation = Mutation::begin("create", &self.in_flight);
        let result = self.client.create_task(&draft).await;
        mutation.resolve(result.is_ok());

        match result {
            Ok(task) => {
                tracing::info!(id = task.id, "Created task");
                mutation.apply(&self.state, |list| list.prepend(task.clone()));
                self.render();
                self.refresh_counters();
                self.view.reset_create_form();
                self.notify(CREATE_OK, NotificationKind::Success);
                Ok(task)
            }
            Err(e) => Err(self.reject("create", e.into(), CREATE_FAILED)),
        }
    }

    /// Send revised fields for `id` and replace the local entry in place.
    ///
    /// If the entry vanished locally while the request was in flight the
    /// server's record is dropped; the board still refreshes.
    pub async fn update(&self, id: i64, draft: TaskDraft) -> Result<Task, TaskError> {
        let mut mutation = Mutation::begin("update", &self.in_flight);
        let result = self.client.update_task(id, &draft).await;
        mutation.resolve(result.is_ok());

        match result {
            Ok(task) => {
                let replaced = mutation
                    .apply(&self.state, |list| list.replace(task.clone()))
                    .unwrap_or(false);
                if replaced {
                    tracing::info!(id, "Updated task");
                } else {
                    tracing::warn!(id, "Updated task is not in the local list; dropping result");
                }
                self.render();
                self.refresh_counters();
                self.view.close_edit_form();
                self.notify(UPDATE_OK, NotificationKind::Success);
                Ok(task)
            }
            Err(e) => Err(self.reject("update", e.into(), UPDATE_FAILED)),
        }
    }

    /// Delete `id` after the user confirms.
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome, TaskError> {
        if self.state.lock().find(id).is_none() {
            return Err(self.reject("delete", TaskError::NotFoundLocally(id), DELETE_FAILED));
        }

        if !self.prompt.confirm(DELETE_CONFIRMATION) {
            tracing::debug!(id, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let mut mutation = Mutation::begin("delete", &self.in_flight);
        let result = self.client.delete_task(id).await;
        mutation.resolve(result.is_ok());

        match result {
            Ok(()) => {
                tracing::info!(id, "Deleted task");
                mutation.apply(&self.state, |list| list.remove(id));
                self.render();
                self.refresh_counters();
                self.notify(DELETE_OK, NotificationKind::Success);
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => Err(self.reject("delete", e.into(), DELETE_FAILED)),
        }
    }

    /// Open the edit form pre-filled with task `id`. Returns false if unknown.
    pub fn open_edit(&self, id: i64) -> bool {
        let form = self.state.lock().find(id).map(EditForm::from);
        match form {
            Some(form) => {
                self.view.open_edit_form(&form);
                true
            }
            None => {
                tracing::debug!(id, "Edit requested for unknown task");
                false
            }
        }
    }

    pub fn set_filter(&self, filter: Filter) {
        self.state.lock().set_filter(filter);
        self.view.set_active_filter(filter);
        self.render();
    }

    /// Project the current list and filter onto the view.
    pub fn render(&self) -> RenderedView {
        let rendered = {
            let state = self.state.lock();
            render::render_tasks(&state.visible())
        };

        match &rendered {
            RenderedView::Empty => self.view.show_empty_state(),
            RenderedView::Grid(html) => self.view.show_grid(html),
        }
        rendered
    }

    /// Animate the three counters towards the current totals.
    pub fn refresh_counters(&self) {
        let counts = self.counts();
        self.counters.animate_to(Counter::Total, to_i64(counts.total));
        self.counters.animate_to(Counter::Completed, to_i64(counts.completed));
        self.counters.animate_to(Counter::Pending, to_i64(counts.pending));
    }

    pub fn notify(&self, message: &str, kind: NotificationKind) {
        self.notifier.show(message, kind);
    }

    /// Common failure path: log the detail, show one error notification.
    fn reject(&self, operation: &'static str, error: TaskError, message: &str) -> TaskError {
        tracing::error!(
            operation,
            kind = ?error.kind(),
            hint = %error.user_message(),
            "Task operation failed: {}",
            error
        );
        self.notify(message, NotificationKind::Error);
        error
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
