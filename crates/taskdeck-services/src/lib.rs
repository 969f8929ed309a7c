pub mod client;
pub mod error;
pub mod task;

pub use client::TaskClient;
pub use error::{FailureKind, TaskApiError};
pub use task::{ApiInfo, Priority, Task, TaskDraft, TaskStatus};
