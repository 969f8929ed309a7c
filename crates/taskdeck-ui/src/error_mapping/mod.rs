//! Maps UI errors to taskdeck_core::AppError for consistent user-facing messages.

mod task;
