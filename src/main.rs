use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use taskdeck_core::AppError;
use taskdeck_services::{Priority, TaskDraft, TaskStatus};
use taskdeck_ui::{
    ConfirmPrompt, Counter, EditForm, Filter, NotificationKind, TaskListController, TaskView,
    UiEvent,
};

/// Terminal stand-in for the task board page.
#[derive(Default)]
struct TerminalView {
    html: Mutex<Option<String>>,
    filter: Mutex<Filter>,
}

impl TaskView for TerminalView {
    fn show_grid(&self, html: &str) {
        *self.html.lock() = Some(html.to_string());
    }

    fn show_empty_state(&self) {
        *self.html.lock() = None;
    }

    fn set_counter(&self, counter: Counter, value: i64) {
        tracing::trace!(counter = counter.element_id(), value, "Counter");
    }

    fn show_notification(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => println!("✓ {}", message),
            NotificationKind::Error => println!("✗ {}", message),
        }
    }

    fn hide_notification(&self) {}

    fn reset_create_form(&self) {}

    fn open_edit_form(&self, form: &EditForm) {
        println!(
            "Editing #{}: {} | {} | {} | {}",
            form.id, form.title, form.description, form.priority, form.status
        );
    }

    fn close_edit_form(&self) {}

    fn set_active_filter(&self, filter: Filter) {
        *self.filter.lock() = filter;
    }
}

/// `y/N` prompt on stdin.
struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

const HELP: &str = "\
Commands:
  list                          show tasks under the current filter
  filter <all|pending|in_progress|completed>
  add <title> [| description [| priority [| status]]]
  edit <id> [title [| description [| priority [| status]]]]
  delete <id>
  reload                        fetch the list again
  health                        probe the API
  html                          print the rendered board markup
  help
  quit";

/// Fill a draft from `title | description | priority | status`, starting from `base`.
fn parse_draft(args: &str, base: TaskDraft) -> TaskDraft {
    let mut parts = args.split('|').map(str::trim);
    let mut draft = base;
    if let Some(title) = parts.next().filter(|s| !s.is_empty()) {
        draft.title = title.to_string();
    }
    if let Some(description) = parts.next() {
        draft.description = description.to_string();
    }
    if let Some(priority) = parts.next().filter(|s| !s.is_empty()) {
        draft.priority = Priority::from(priority);
    }
    if let Some(status) = parts.next().filter(|s| !s.is_empty()) {
        draft.status = TaskStatus::from(status);
    }
    draft
}

fn print_tasks(controller: &TaskListController, view: &TerminalView) {
    let tasks = controller.visible_tasks();
    if tasks.is_empty() {
        println!("No tasks found");
    }
    for task in &tasks {
        println!(
            "#{:<4} [{:<11}] {:<6} {}",
            task.id,
            task.status.to_string(),
            task.priority.to_string(),
            task.title
        );
        if let Some(description) = task.description_text() {
            println!("       {}", description);
        }
    }

    let counts = controller.counts();
    println!(
        "Total: {}  Completed: {}  Pending: {}  (filter: {})",
        counts.total,
        counts.completed,
        counts.pending,
        *view.filter.lock()
    );
}

fn main() -> Result<()> {
    // Initialize core
    taskdeck_core::init()?;

    let mut app = match taskdeck_core::App::new() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };
    app.initialize()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let view = Arc::new(TerminalView::default());
    let controller =
        match TaskListController::from_config(app.config(), view.clone(), Arc::new(StdinPrompt)) {
            Ok(controller) => controller,
            Err(e) => {
                let error = AppError::from(e);
                eprintln!("{}", error.user_message());
                return Err(error.into());
            }
        };

    tracing::info!(api = %controller.client().base_url(), "Taskdeck started");
    println!("Taskdeck - {}", controller.client().base_url());
    println!("Type 'help' for commands.");

    runtime.block_on(controller.dispatch(UiEvent::Ready));
    print_tasks(&controller, &view);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));
        let args = args.trim();

        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            "list" => print_tasks(&controller, &view),
            "reload" => {
                runtime.block_on(controller.dispatch(UiEvent::Ready));
                print_tasks(&controller, &view);
            }
            "filter" => match args.parse::<Filter>() {
                Ok(filter) => {
                    runtime.block_on(controller.dispatch(UiEvent::FilterSelected(filter)));
                    print_tasks(&controller, &view);
                }
                Err(e) => println!("{}", e),
            },
            "add" => {
                if args.is_empty() {
                    println!("Usage: add <title> [| description [| priority [| status]]]");
                    continue;
                }
                let draft = parse_draft(args, TaskDraft::new(""));
                runtime.block_on(controller.dispatch(UiEvent::SubmitCreate(draft)));
            }
            "edit" => {
                let (id, rest) = args.split_once(' ').unwrap_or((args, ""));
                let Ok(id) = id.parse::<i64>() else {
                    println!("Usage: edit <id> [title [| description [| priority [| status]]]]");
                    continue;
                };
                let Some(task) = controller.tasks().into_iter().find(|t| t.id == id) else {
                    println!("No task #{}", id);
                    continue;
                };
                runtime.block_on(controller.dispatch(UiEvent::EditRequested(id)));
                if rest.trim().is_empty() {
                    runtime.block_on(controller.dispatch(UiEvent::CloseEditForm));
                    continue;
                }
                let draft = parse_draft(rest, TaskDraft::from(&task));
                runtime.block_on(controller.dispatch(UiEvent::SubmitEdit { id, draft }));
            }
            "delete" => match UiEvent::from_card_action("delete", args) {
                Some(event) => runtime.block_on(controller.dispatch(event)),
                None => println!("Usage: delete <id>"),
            },
            "health" => match runtime.block_on(controller.client().health_check()) {
                Ok(true) => println!("API is healthy"),
                Ok(false) => println!("API answered but reported a failure"),
                Err(e) => println!("{}", e.user_message()),
            },
            "html" => match view.html.lock().as_deref() {
                Some(html) => println!("{}", html),
                None => println!("(empty state)"),
            },
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    // Graceful shutdown
    app.shutdown()?;
    runtime.shutdown_timeout(std::time::Duration::from_millis(200));

    Ok(())
}
