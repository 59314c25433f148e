// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner of one command queue and its executor thread.
//!
//! Producers share a [`CommandManager`] (typically through an `Arc`) and
//! call [`submit`](CommandManager::submit). Each manager is independent, so
//! tests and embedders can run several side by side.

use std::sync::Arc;
use std::thread::JoinHandle;

use banana_config::{ExecutorConfig, StorageConfig};
use banana_core::BananaError;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::command::Command;
use crate::database::open_connection;
use crate::executor::{Executor, ExecutorShared, ExecutorState};
use crate::queue::{CommandQueue, QueueError};

/// Snapshot of executor progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorStats {
    pub state: ExecutorState,
    /// Commands waiting in the queue.
    pub pending: usize,
    /// Commands whose outcome has been decided (success or failure).
    pub executed: u64,
    /// Commands that reported an error.
    pub failed: u64,
}

/// Serializes commands from any number of producers onto one writer thread.
pub struct CommandManager {
    queue: Arc<CommandQueue<Command>>,
    shared: Arc<ExecutorShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CommandManager {
    /// Create the queue and start the executor thread.
    ///
    /// The database is opened once up front so an unusable path fails here
    /// with [`BananaError::Storage`] instead of on every command.
    pub fn start(
        storage: &StorageConfig,
        executor: &ExecutorConfig,
    ) -> Result<Self, BananaError> {
        open_connection(storage).map_err(|e| BananaError::Storage {
            source: Box::new(e),
        })?;

        let queue = Arc::new(CommandQueue::with_capacity(executor.queue_capacity));
        let runner = Executor::new(Arc::clone(&queue), storage.clone());
        let shared = runner.shared();
        let worker = runner
            .spawn(&executor.thread_name)
            .map_err(|e| {
                BananaError::Internal(format!("failed to spawn executor thread: {e}"))
            })?;

        info!(
            thread = %executor.thread_name,
            capacity = ?executor.queue_capacity,
            "command manager started"
        );

        Ok(Self {
            queue,
            shared,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Queue `command` for execution. Its callback fires later on the
    /// executor thread.
    ///
    /// Never blocks on an unbounded queue; waits for space on a bounded one.
    /// Rejects only after [`shutdown`](Self::shutdown) or an executor fault.
    pub fn submit(&self, command: Command) -> Result<(), QueueError<Command>> {
        debug!(table = command.table(), kind = %command.kind(), "command submitted");
        self.queue.push(command)
    }

    /// Like [`submit`](Self::submit), but a full bounded queue rejects
    /// immediately with [`QueueError::Full`].
    pub fn try_submit(&self, command: Command) -> Result<(), QueueError<Command>> {
        self.queue.try_push(command)
    }

    /// Number of commands waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether the executor thread is still processing commands.
    pub fn is_running(&self) -> bool {
        !self.shared.state().is_terminal()
    }

    pub fn stats(&self) -> ExecutorStats {
        ExecutorStats {
            state: self.shared.state(),
            pending: self.queue.len(),
            executed: self.shared.executed(),
            failed: self.shared.failed(),
        }
    }

    /// Stop accepting commands, run everything already queued, and join the
    /// executor thread. Safe to call more than once.
    ///
    /// Called from inside a callback, this only closes the queue; the
    /// executor drains and exits on its own.
    pub fn shutdown(&self) {
        self.queue.close();

        let handle = {
            let mut worker = self.worker.lock();
            match worker.as_ref() {
                Some(h) if h.thread().id() == std::thread::current().id() => return,
                _ => worker.take(),
            }
        };
        let Some(handle) = handle else {
            return;
        };
        if handle.join().is_err() {
            // Command panics are caught inside the loop, so this is a panic
            // outside command execution.
            error!("executor thread terminated abnormally");
        }
        info!(
            executed = self.shared.executed(),
            failed = self.shared.failed(),
            "command manager shut down"
        );
    }
}

impl Drop for CommandManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banana_core::Record;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn start_in(dir: &std::path::Path, capacity: Option<usize>) -> CommandManager {
        let storage = StorageConfig {
            database_path: dir.join("manager.db").display().to_string(),
            ..StorageConfig::default()
        };
        let executor = ExecutorConfig {
            queue_capacity: capacity,
            thread_name: "manager-test".to_string(),
        };
        CommandManager::start(&storage, &executor).unwrap()
    }

    #[test]
    fn shutdown_drains_pending_commands() {
        let dir = tempdir().unwrap();
        let manager = start_in(dir.path(), None);
        let fired = Arc::new(AtomicUsize::new(0));

        let f = Arc::clone(&fired);
        manager
            .submit(Command::create("T", Record::new().with("n", 0), move |o| {
                assert!(o.is_ok());
                f.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        for n in 0..20 {
            let f = Arc::clone(&fired);
            manager
                .submit(Command::insert("T", Record::new().with("n", n), move |_| {
                    f.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }

        manager.shutdown();
        assert_eq!(fired.load(Ordering::SeqCst), 21);

        let stats = manager.stats();
        assert_eq!(stats.state, ExecutorState::Stopped);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.executed, 21);
        assert_eq!(stats.failed, 0);
        assert!(!manager.is_running());
    }

    #[test]
    fn submit_after_shutdown_returns_command() {
        let dir = tempdir().unwrap();
        let manager = start_in(dir.path(), None);
        manager.shutdown();
        manager.shutdown();

        let err = manager
            .submit(Command::insert("T", Record::new(), |_| {}))
            .unwrap_err();
        assert!(matches!(err, QueueError::Closed(_)));
        assert_eq!(err.into_inner().table(), "T");
    }

    #[test]
    fn shutdown_from_callback_does_not_deadlock() {
        let dir = tempdir().unwrap();
        let manager = Arc::new(start_in(dir.path(), None));
        let (tx, rx) = std::sync::mpsc::channel();

        let inner = Arc::clone(&manager);
        manager
            .submit(Command::create("T", Record::new().with("n", 1), move |_| {
                inner.shutdown();
                let _ = tx.send(());
            }))
            .unwrap();

        rx.recv_timeout(std::time::Duration::from_secs(5))
            .expect("callback should complete");
        manager.shutdown();
        assert!(!manager.is_running());
    }

    #[test]
    fn start_fails_on_unusable_database_path() {
        let dir = tempdir().unwrap();
        let storage = StorageConfig {
            database_path: dir.path().join("missing/dir/x.db").display().to_string(),
            ..StorageConfig::default()
        };
        let err = CommandManager::start(&storage, &ExecutorConfig::default())
            .err()
            .expect("start should fail");
        assert!(matches!(err, BananaError::Storage { .. }), "{err}");
    }

    #[test]
    fn failures_are_counted() {
        let dir = tempdir().unwrap();
        let manager = start_in(dir.path(), Some(8));
        manager
            .try_submit(Command::insert("MISSING", Record::new().with("a", 1), |o| {
                assert!(o.unwrap_err().is_statement_failure());
            }))
            .unwrap();
        manager.shutdown();
        assert_eq!(manager.stats().failed, 1);
    }
}
