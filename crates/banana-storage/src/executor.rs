// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single writer thread.
//!
//! Loop: block on the queue, open a fresh connection, run the command, drop
//! the connection, report the outcome. Every database write in a manager
//! goes through this one thread.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use banana_config::StorageConfig;
use banana_core::CommandError;
use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::database::open_connection;
use crate::queue::CommandQueue;

/// Where the executor is in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExecutorState {
    /// Waiting on an empty queue.
    Idle = 0,
    Connecting = 1,
    Executing = 2,
    /// Running the command callback.
    Reporting = 3,
    /// Queue closed and drained; the thread has exited.
    Stopped = 4,
    /// A command panicked; the thread has exited without draining.
    Faulted = 5,
}

impl ExecutorState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ExecutorState::Idle,
            1 => ExecutorState::Connecting,
            2 => ExecutorState::Executing,
            3 => ExecutorState::Reporting,
            4 => ExecutorState::Stopped,
            _ => ExecutorState::Faulted,
        }
    }

    /// Whether the thread has exited.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutorState::Stopped | ExecutorState::Faulted)
    }
}

/// Counters and state shared between the executor thread and its manager.
#[derive(Debug)]
pub struct ExecutorShared {
    state: AtomicU8,
    executed: AtomicU64,
    failed: AtomicU64,
}

impl ExecutorShared {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(ExecutorState::Idle as u8),
            executed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ExecutorState {
        ExecutorState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ExecutorState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Runs queued commands one at a time against short-lived connections.
pub struct Executor {
    queue: Arc<CommandQueue<Command>>,
    storage: StorageConfig,
    shared: Arc<ExecutorShared>,
}

impl Executor {
    pub fn new(queue: Arc<CommandQueue<Command>>, storage: StorageConfig) -> Self {
        Self {
            queue,
            storage,
            shared: Arc::new(ExecutorShared::new()),
        }
    }

    pub fn shared(&self) -> Arc<ExecutorShared> {
        Arc::clone(&self.shared)
    }

    /// Start the loop on a dedicated named thread.
    pub fn spawn(self, thread_name: &str) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(move || self.run())
    }

    /// Process commands until the queue is closed and drained.
    ///
    /// A panic escaping a command (including its callback) stops the loop for
    /// good: the state becomes [`ExecutorState::Faulted`] and the queue is
    /// closed so producers see rejections instead of silent loss.
    pub fn run(self) {
        info!(path = %self.storage.database_path, "executor started");
        while let Some(command) = self.queue.pop() {
            let table = command.table().to_string();
            let kind = command.kind();
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| self.process(command))) {
                error!(
                    %table,
                    %kind,
                    panic = panic_message(panic.as_ref()),
                    "command panicked, executor stopping"
                );
                self.queue.close();
                self.shared.set_state(ExecutorState::Faulted);
                return;
            }
        }
        self.shared.set_state(ExecutorState::Stopped);
        info!(
            executed = self.shared.executed(),
            failed = self.shared.failed(),
            "executor stopped"
        );
    }

    fn process(&self, command: Command) {
        self.shared.set_state(ExecutorState::Connecting);
        let outcome = match open_connection(&self.storage) {
            Ok(conn) => {
                self.shared.set_state(ExecutorState::Executing);
                command.run(&conn)
            }
            Err(e) => Err(CommandError::statement_failure(format!(
                "unable to open {}: {e}",
                self.storage.database_path
            ))),
        };

        match &outcome {
            Ok(success) => debug!(
                table = %success.table,
                kind = %success.kind,
                rows = success.rows_affected,
                "command succeeded"
            ),
            Err(err) => {
                self.shared.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    table = command.table(),
                    kind = %command.kind(),
                    error = %err,
                    "command failed"
                );
            }
        }
        self.shared.executed.fetch_add(1, Ordering::Relaxed);

        self.shared.set_state(ExecutorState::Reporting);
        command.report(outcome);
        self.shared.set_state(ExecutorState::Idle);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("(non-string panic)")
}
