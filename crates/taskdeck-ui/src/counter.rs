//! Stepwise animation of the summary counters.
//!
//! A transition from `a` to `b` writes every intermediate value, one unit per
//! step, spread over a fixed total duration. Starting a new transition for a
//! counter cancels the one in flight and continues from whatever value is
//! currently displayed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::view::{Counter, TaskView};

pub struct CounterAnimator {
    view: Arc<dyn TaskView>,
    duration: Duration,
    displayed: Arc<Mutex<HashMap<Counter, i64>>>,
    running: Mutex<HashMap<Counter, CancellationToken>>,
}

impl CounterAnimator {
    pub fn new(view: Arc<dyn TaskView>, duration: Duration) -> Self {
        Self {
            view,
            duration,
            displayed: Arc::new(Mutex::new(HashMap::new())),
            running: Mutex::new(HashMap::new()),
        }
    }

    /// Value currently shown for `counter` (0 before the first update).
    pub fn displayed(&self, counter: Counter) -> i64 {
        self.displayed.lock().get(&counter).copied().unwrap_or(0)
    }

    /// Animate `counter` towards `target`.
    pub fn animate_to(&self, counter: Counter, target: i64) {
        // Replace and cancel under one lock: at most one live token per counter
        let token = CancellationToken::new();
        if let Some(previous) = self.running.lock().insert(counter, token.clone()) {
            previous.cancel();
        }

        let current = self.displayed(counter);
        let delta = target - current;
        if delta == 0 {
            return;
        }

        let steps = delta.unsigned_abs();
        let step = self.duration / u32::try_from(steps).unwrap_or(u32::MAX);

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) if !step.is_zero() => handle,
            _ => {
                // No timer available (or zero duration): jump straight to the target
                let mut shown = self.displayed.lock();
                if !token.is_cancelled() {
                    shown.insert(counter, target);
                    drop(shown);
                    self.view.set_counter(counter, target);
                }
                return;
            }
        };

        tracing::trace!(?counter, current, target, ?step, "Animating counter");

        let view = self.view.clone();
        let displayed = self.displayed.clone();
        let increment = delta.signum();
        runtime.spawn(async move {
            let mut value = current;
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(step) => {}
                }

                value += increment;
                {
                    let mut shown = displayed.lock();
                    if token.is_cancelled() {
                        return;
                    }
                    shown.insert(counter, value);
                }
                view.set_counter(counter, value);

                if value == target {
                    break;
                }
            }
        });
    }
}
