//! Per-mutation lifecycle (create/update/delete/load).
//!
//! `Idle -> Pending -> {Applied | Rejected} -> Idle`. Each in-flight request
//! owns its own state; concurrent mutations are not coordinated.

/// Lifecycle phase of a single remote mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    /// Request sent, no response yet.
    Pending,
    /// Server acknowledged; the local list was updated.
    Applied,
    /// Request failed; the local list was left untouched.
    Rejected,
}

impl MutationState {
    /// State after issuing the request. Only valid from `Idle`.
    pub fn begin(self) -> Self {
        match self {
            MutationState::Idle => MutationState::Pending,
            other => other,
        }
    }

    /// State after the response (or failure) arrived.
    pub fn resolve(self, succeeded: bool) -> Self {
        match self {
            MutationState::Pending if succeeded => MutationState::Applied,
            MutationState::Pending => MutationState::Rejected,
            other => other,
        }
    }

    /// State once the completion step (render, notify) has run.
    pub fn settle(self) -> Self {
        match self {
            MutationState::Applied | MutationState::Rejected => MutationState::Idle,
            other => other,
        }
    }

    /// True while a request is outstanding.
    pub fn is_pending(self) -> bool {
        matches!(self, MutationState::Pending)
    }

    /// True if the outcome may touch the local task list.
    pub fn may_mutate(self) -> bool {
        matches!(self, MutationState::Applied)
    }
}
