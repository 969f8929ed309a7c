//! Integration tests for TaskListController using wiremock.
//!
//! A recording view stands in for the host document so each test can check
//! exactly what the board would show.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use taskdeck_services::{Priority, TaskClient, TaskDraft, TaskStatus};
use taskdeck_ui::{
    ConfirmPrompt, ControllerSettings, Counter, DeleteOutcome, EditForm, ErrorKind, Filter,
    NotificationKind, RenderedView, TaskListController, TaskView, UiEvent, DELETE_CONFIRMATION,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingView {
    grid: Mutex<Option<String>>,
    empty_shown: AtomicBool,
    counters: Mutex<HashMap<Counter, i64>>,
    notifications: Mutex<Vec<(String, NotificationKind)>>,
    create_resets: AtomicUsize,
    edit_form: Mutex<Option<EditForm>>,
    edit_closes: AtomicUsize,
    active_filter: Mutex<Option<Filter>>,
}

impl RecordingView {
    fn grid(&self) -> String {
        self.grid.lock().clone().unwrap_or_default()
    }

    fn counter(&self, counter: Counter) -> i64 {
        self.counters.lock().get(&counter).copied().unwrap_or(0)
    }

    fn notifications(&self) -> Vec<(String, NotificationKind)> {
        self.notifications.lock().clone()
    }
}

impl TaskView for RecordingView {
    fn show_grid(&self, html: &str) {
        *self.grid.lock() = Some(html.to_string());
        self.empty_shown.store(false, Ordering::SeqCst);
    }

    fn show_empty_state(&self) {
        *self.grid.lock() = None;
        self.empty_shown.store(true, Ordering::SeqCst);
    }

    fn set_counter(&self, counter: Counter, value: i64) {
        self.counters.lock().insert(counter, value);
    }

    fn show_notification(&self, message: &str, kind: NotificationKind) {
        self.notifications.lock().push((message.to_string(), kind));
    }

    fn hide_notification(&self) {}

    fn reset_create_form(&self) {
        self.create_resets.fetch_add(1, Ordering::SeqCst);
    }

    fn open_edit_form(&self, form: &EditForm) {
        *self.edit_form.lock() = Some(form.clone());
    }

    fn close_edit_form(&self) {
        self.edit_closes.fetch_add(1, Ordering::SeqCst);
    }

    fn set_active_filter(&self, filter: Filter) {
        *self.active_filter.lock() = Some(filter);
    }
}

/// Prompt with a fixed answer that records what it was asked.
struct ScriptedPrompt {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            asked: Mutex::new(Vec::new()),
        })
    }
}

impl ConfirmPrompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.asked.lock().push(message.to_string());
        self.answer
    }
}

/// Helper to create a test task
fn test_task(id: i64, title: &str, status: &str, priority: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": "",
        "status": status,
        "priority": priority,
        "created_at": "2026-01-30T12:00:00.000000",
        "updated_at": "2026-01-30T12:00:00.000000"
    })
}

fn settings() -> ControllerSettings {
    ControllerSettings {
        // Counters jump straight to their targets
        counter_animation: Duration::ZERO,
        notification: Duration::from_secs(60),
        initial_filter: Filter::All,
    }
}

fn controller(
    server: &MockServer,
    prompt: Arc<ScriptedPrompt>,
) -> (Arc<TaskListController>, Arc<RecordingView>) {
    let view = Arc::new(RecordingView::default());
    let client = TaskClient::new(&server.uri()).unwrap();
    let controller = TaskListController::new(client, view.clone(), prompt, settings());
    (Arc::new(controller), view)
}

async fn mount_list(server: &MockServer, tasks: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks))
        .mount(server)
        .await;
}

async fn seeded() -> (MockServer, Arc<TaskListController>, Arc<RecordingView>) {
    let server = MockServer::start().await;
    mount_list(
        &server,
        serde_json::json!([
            test_task(1, "Write report", "pending", "high"),
            test_task(2, "Water plants", "completed", "low"),
            test_task(3, "Fix bike", "in_progress", "medium"),
        ]),
    )
    .await;

    let (controller, view) = controller(&server, ScriptedPrompt::answering(true));
    controller.load().await.unwrap();
    (server, controller, view)
}

fn ids(controller: &TaskListController) -> Vec<i64> {
    controller.tasks().iter().map(|t| t.id).collect()
}

#[tokio::test]
async fn test_load_renders_list_and_counters() {
    let (_server, controller, view) = seeded().await;

    assert_eq!(ids(&controller), vec![1, 2, 3]);
    let grid = view.grid();
    assert!(grid.contains("Write report"));
    assert!(grid.contains("Fix bike"));
    assert_eq!(view.counter(Counter::Total), 3);
    assert_eq!(view.counter(Counter::Completed), 1);
    assert_eq!(view.counter(Counter::Pending), 1);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_load_empty_shows_empty_state() {
    let server = MockServer::start().await;
    mount_list(&server, serde_json::json!([])).await;
    let (controller, view) = controller(&server, ScriptedPrompt::answering(true));

    controller.load().await.unwrap();

    assert!(view.empty_shown.load(Ordering::SeqCst));
    assert_eq!(controller.render(), RenderedView::Empty);
    assert_eq!(view.counter(Counter::Total), 0);
}

#[tokio::test]
async fn test_load_failure_keeps_list_and_notifies_once() {
    let (server, controller, view) = seeded().await;
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = controller.load().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteRejection);
    assert_eq!(ids(&controller), vec![1, 2, 3]);
    assert_eq!(
        view.notifications(),
        vec![("Failed to load tasks".to_string(), NotificationKind::Error)]
    );
}

#[tokio::test]
async fn test_create_prepends_server_record() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(serde_json::json!({
            "title": "Buy milk",
            "description": "",
            "priority": "low",
            "status": "pending"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(test_task(7, "Buy milk", "pending", "low")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = TaskDraft::new("Buy milk").priority(Priority::Low);
    let created = controller.create(draft).await.unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(ids(&controller), vec![7, 1, 2, 3]);
    assert_eq!(view.counter(Counter::Total), 4);
    assert_eq!(view.counter(Counter::Pending), 2);
    assert_eq!(view.counter(Counter::Completed), 1);
    assert_eq!(view.create_resets.load(Ordering::SeqCst), 1);
    assert_eq!(
        view.notifications(),
        vec![(
            "Task created successfully!".to_string(),
            NotificationKind::Success
        )]
    );

    // Newest card comes first and carries no entrance delay
    let grid = view.grid();
    let first = grid.find("Buy milk").unwrap();
    let second = grid.find("Write report").unwrap();
    assert!(first < second);
    assert!(grid.contains("animation-delay: 0.0s"));
}

#[tokio::test]
async fn test_create_rejected_leaves_list_untouched() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Title is required"
        })))
        .mount(&server)
        .await;

    let err = controller.create(TaskDraft::new("")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteRejection);
    assert_eq!(ids(&controller), vec![1, 2, 3]);
    assert_eq!(view.create_resets.load(Ordering::SeqCst), 0);
    assert_eq!(
        view.notifications(),
        vec![("Failed to create task".to_string(), NotificationKind::Error)]
    );
}

#[tokio::test]
async fn test_update_replaces_in_place() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(test_task(1, "Write report", "completed", "high")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = TaskDraft::new("Write report")
        .priority(Priority::High)
        .status(TaskStatus::Completed);
    controller.update(1, draft).await.unwrap();

    assert_eq!(ids(&controller), vec![1, 2, 3]);
    assert_eq!(controller.tasks()[0].status, TaskStatus::Completed);
    assert_eq!(view.counter(Counter::Completed), 2);
    assert_eq!(view.counter(Counter::Pending), 0);
    assert_eq!(view.counter(Counter::Total), 3);
    assert_eq!(view.edit_closes.load(Ordering::SeqCst), 1);
    assert_eq!(
        view.notifications().last().unwrap(),
        &(
            "Task updated successfully!".to_string(),
            NotificationKind::Success
        )
    );
}

#[tokio::test]
async fn test_update_not_found_is_rejection() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = controller
        .update(99, TaskDraft::new("Ghost"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteRejection);
    assert_eq!(ids(&controller), vec![1, 2, 3]);
    assert_eq!(view.edit_closes.load(Ordering::SeqCst), 0);
    assert_eq!(
        view.notifications(),
        vec![("Failed to update task".to_string(), NotificationKind::Error)]
    );
}

#[tokio::test]
async fn test_update_for_task_missing_locally_is_dropped() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/99"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(test_task(99, "Elsewhere", "completed", "low")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = controller.update(99, TaskDraft::new("Elsewhere")).await;

    assert!(result.is_ok());
    assert_eq!(ids(&controller), vec![1, 2, 3]);
    assert!(!view.grid().contains("Elsewhere"));
    assert_eq!(view.counter(Counter::Total), 3);
    assert_eq!(view.counter(Counter::Completed), 1);
    assert_eq!(view.counter(Counter::Pending), 1);
    assert_eq!(view.edit_closes.load(Ordering::SeqCst), 1);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_crud_sequence_matches_server_state() {
    let (server, controller, _view) = seeded().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(test_task(7, "Buy milk", "pending", "low")),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(test_task(7, "Buy milk", "completed", "low")),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    controller
        .create(TaskDraft::new("Buy milk").priority(Priority::Low))
        .await
        .unwrap();
    let draft = TaskDraft::new("Buy milk")
        .priority(Priority::Low)
        .status(TaskStatus::Completed);
    controller.update(7, draft).await.unwrap();
    assert_eq!(controller.delete(2).await.unwrap(), DeleteOutcome::Deleted);

    // What the server now holds, newest first as the board orders it
    let remote: Vec<(i64, TaskStatus)> = vec![
        (7, TaskStatus::Completed),
        (1, TaskStatus::Pending),
        (3, TaskStatus::InProgress),
    ];
    let local: Vec<(i64, TaskStatus)> = controller
        .tasks()
        .into_iter()
        .map(|t| (t.id, t.status))
        .collect();
    assert_eq!(local, remote);

    let counts = controller.counts();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.completed, 1);
    assert_eq!(counts.pending, 1);
}

#[tokio::test]
async fn test_delete_confirmed_removes_task() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        serde_json::json!([
            test_task(1, "Write report", "pending", "high"),
            test_task(2, "Water plants", "completed", "low"),
        ]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Task deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let prompt = ScriptedPrompt::answering(true);
    let (controller, view) = controller(&server, prompt.clone());
    controller.load().await.unwrap();

    let outcome = controller.delete(2).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(*prompt.asked.lock(), vec![DELETE_CONFIRMATION.to_string()]);
    assert_eq!(ids(&controller), vec![1]);
    assert_eq!(view.counter(Counter::Total), 1);
    assert_eq!(view.counter(Counter::Completed), 0);
    assert!(!view.grid().contains("Water plants"));
    assert_eq!(
        view.notifications(),
        vec![(
            "Task deleted successfully!".to_string(),
            NotificationKind::Success
        )]
    );
}

#[tokio::test]
async fn test_delete_declined_sends_nothing() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        serde_json::json!([test_task(1, "Write report", "pending", "high")]),
    )
    .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (controller, view) = controller(&server, ScriptedPrompt::answering(false));
    controller.load().await.unwrap();

    let outcome = controller.delete(1).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(ids(&controller), vec![1]);
    assert!(view.notifications().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_id_fails_locally() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller.delete(42).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFoundLocally);
    assert_eq!(
        view.notifications(),
        vec![("Failed to delete task".to_string(), NotificationKind::Error)]
    );
}

#[tokio::test]
async fn test_delete_server_failure_keeps_task() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = controller.delete(3).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteRejection);
    assert_eq!(ids(&controller), vec![1, 2, 3]);
    assert_eq!(
        view.notifications(),
        vec![("Failed to delete task".to_string(), NotificationKind::Error)]
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_failure() {
    let view = Arc::new(RecordingView::default());
    let client = TaskClient::new("http://127.0.0.1:1").unwrap();
    let controller =
        TaskListController::new(client, view.clone(), ScriptedPrompt::answering(true), settings());

    let err = controller.load().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert!(controller.tasks().is_empty());
    assert_eq!(view.notifications().len(), 1);
}

#[tokio::test]
async fn test_filter_limits_visible_cards() {
    let (_server, controller, view) = seeded().await;

    controller.set_filter(Filter::Completed);

    assert_eq!(*view.active_filter.lock(), Some(Filter::Completed));
    let grid = view.grid();
    assert!(grid.contains("Water plants"));
    assert!(!grid.contains("Write report"));
    // Counters always reflect the whole list
    assert_eq!(view.counter(Counter::Total), 3);

    controller.set_filter(Filter::Pending);
    let visible: Vec<_> = controller.visible_tasks().iter().map(|t| t.id).collect();
    assert_eq!(visible, vec![1]);
}

#[tokio::test]
async fn test_filter_with_no_matches_shows_empty_state() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        serde_json::json!([test_task(1, "Write report", "pending", "high")]),
    )
    .await;
    let (controller, view) = controller(&server, ScriptedPrompt::answering(true));
    controller.load().await.unwrap();

    controller.set_filter(Filter::Completed);

    assert!(view.empty_shown.load(Ordering::SeqCst));
    assert_eq!(view.counter(Counter::Total), 1);
}

#[tokio::test]
async fn test_markup_in_titles_is_escaped() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        serde_json::json!([test_task(
            1,
            "<script>alert('x')</script>",
            "pending",
            "low"
        )]),
    )
    .await;
    let (controller, view) = controller(&server, ScriptedPrompt::answering(true));

    controller.load().await.unwrap();

    let grid = view.grid();
    assert!(!grid.contains("<script>"));
    assert!(grid.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_edit_request_fills_form() {
    let (_server, controller, view) = seeded().await;

    assert!(controller.open_edit(3));
    let form = view.edit_form.lock().clone().unwrap();
    assert_eq!(form.id, 3);
    assert_eq!(form.title, "Fix bike");
    assert_eq!(form.status, TaskStatus::InProgress);

    assert!(!controller.open_edit(404));
}

#[tokio::test]
async fn test_dispatch_routes_card_actions() {
    let (_server, controller, view) = seeded().await;

    let event = UiEvent::from_card_action("edit", "2").unwrap();
    controller.dispatch(event).await;
    assert_eq!(view.edit_form.lock().as_ref().map(|f| f.id), Some(2));

    controller.dispatch(UiEvent::CloseEditForm).await;
    assert_eq!(view.edit_closes.load(Ordering::SeqCst), 1);

    controller
        .dispatch(UiEvent::FilterSelected(Filter::InProgress))
        .await;
    assert_eq!(controller.filter(), Filter::InProgress);
}

#[tokio::test]
async fn test_dispatch_absorbs_handler_failures() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    controller
        .dispatch(UiEvent::SubmitCreate(TaskDraft::new("Buy milk")))
        .await;
    controller.dispatch(UiEvent::DeleteRequested(42)).await;

    assert_eq!(ids(&controller), vec![1, 2, 3]);
    assert_eq!(
        view.notifications(),
        vec![
            ("Failed to create task".to_string(), NotificationKind::Error),
            ("Failed to delete task".to_string(), NotificationKind::Error),
        ]
    );
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_concurrent_creates_both_land() {
    let (server, controller, view) = seeded().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(serde_json::json!({
            "title": "A",
            "description": "",
            "priority": "medium",
            "status": "pending"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(test_task(10, "A", "pending", "medium"))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(serde_json::json!({
            "title": "B",
            "description": "",
            "priority": "medium",
            "status": "pending"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(test_task(11, "B", "pending", "medium")),
        )
        .mount(&server)
        .await;

    let (a, b) = tokio::join!(
        controller.create(TaskDraft::new("A")),
        controller.create(TaskDraft::new("B")),
    );
    a.unwrap();
    b.unwrap();

    // B answers first, A is prepended after it
    assert_eq!(ids(&controller), vec![10, 11, 1, 2, 3]);
    assert_eq!(view.counter(Counter::Total), 5);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_event_loop_processes_until_closed() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        serde_json::json!([test_task(1, "Write report", "pending", "high")]),
    )
    .await;
    let (controller, view) = controller(&server, ScriptedPrompt::answering(true));

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = tokio::spawn(controller.clone().run(rx));
    tx.send(UiEvent::Ready).unwrap();
    drop(tx);
    handle.await.unwrap();

    assert_eq!(ids(&controller), vec![1]);
    assert_eq!(view.counter(Counter::Total), 1);
}

#[tokio::test]
async fn test_counters_animate_to_final_values() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        serde_json::json!([
            test_task(1, "a", "pending", "low"),
            test_task(2, "b", "pending", "low"),
            test_task(3, "c", "completed", "low"),
        ]),
    )
    .await;
    let view = Arc::new(RecordingView::default());
    let client = TaskClient::new(&server.uri()).unwrap();
    let controller = TaskListController::new(
        client,
        view.clone(),
        ScriptedPrompt::answering(true),
        ControllerSettings {
            counter_animation: Duration::from_millis(60),
            ..settings()
        },
    );

    controller.load().await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(view.counter(Counter::Total), 3);
    assert_eq!(view.counter(Counter::Pending), 2);
    assert_eq!(view.counter(Counter::Completed), 1);
    assert_eq!(controller.displayed_counter(Counter::Total), 3);
}
