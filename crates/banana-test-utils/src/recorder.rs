// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collects command outcomes delivered on the executor thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use banana_core::CommandOutcome;
use parking_lot::{Condvar, Mutex};

/// One callback invocation, tagged by the label given to
/// [`OutcomeRecorder::callback`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub label: String,
    pub outcome: CommandOutcome,
}

#[derive(Default)]
struct Inner {
    seen: Mutex<Vec<Recorded>>,
    arrived: Condvar,
}

/// Hands out callbacks that append to a shared log, and lets tests wait for
/// a number of outcomes to arrive.
#[derive(Clone, Default)]
pub struct OutcomeRecorder {
    inner: Arc<Inner>,
}

impl OutcomeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A command callback that records its outcome under `label`.
    pub fn callback(
        &self,
        label: impl Into<String>,
    ) -> impl FnOnce(CommandOutcome) + Send + 'static {
        let inner = Arc::clone(&self.inner);
        let label = label.into();
        move |outcome| {
            inner.seen.lock().push(Recorded { label, outcome });
            inner.arrived.notify_all();
        }
    }

    /// Block until at least `count` outcomes are recorded or `timeout`
    /// elapses, then return everything recorded so far in arrival order.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> Vec<Recorded> {
        let deadline = Instant::now() + timeout;
        let mut seen = self.inner.seen.lock();
        while seen.len() < count {
            if self.inner.arrived.wait_until(&mut seen, deadline).timed_out() {
                break;
            }
        }
        seen.clone()
    }

    /// Everything recorded so far.
    pub fn snapshot(&self) -> Vec<Recorded> {
        self.inner.seen.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
