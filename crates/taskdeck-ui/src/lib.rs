//! Task board controller and its presentation helpers.
//!
//! The controller keeps the in-memory task list, talks to the task API through
//! `taskdeck-services`, and drives a host document through the `TaskView`
//! trait.

pub mod controller;
pub mod counter;
pub mod error;
pub mod error_mapping;
pub mod events;
pub mod notify;
pub mod render;
pub mod state;
pub mod view;

pub use controller::{ControllerSettings, DeleteOutcome, TaskListController, DELETE_CONFIRMATION};
pub use error::{ErrorKind, TaskError};
pub use events::UiEvent;
pub use render::RenderedView;
pub use state::{Filter, TaskCounts, TaskListState, UnknownFilter};
pub use view::{ConfirmPrompt, Counter, EditForm, NotificationKind, TaskView};
