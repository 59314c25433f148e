// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-writer SQLite command queue.
//!
//! Producers wrap a [`Record`](banana_core::Record) in a [`Command`] with a
//! callback and hand it to a [`CommandManager`]. One executor thread runs
//! commands in submission order, opening a fresh connection for each, and
//! reports every outcome through the command's callback.
//!
//! ```no_run
//! use banana_config::BananaConfig;
//! use banana_core::Record;
//! use banana_storage::{Command, CommandManager};
//!
//! let config = BananaConfig::default();
//! let manager = CommandManager::start(&config.storage, &config.executor).unwrap();
//! let banana = Record::new().with("Name", "b1").with("Price", 0.5);
//! manager
//!     .submit(Command::create("BANANAS", banana, |outcome| match outcome {
//!         Ok(done) => println!("{done}"),
//!         Err(err) => eprintln!("{err}"),
//!     }))
//!     .unwrap();
//! manager.shutdown();
//! ```

pub mod command;
pub mod database;
pub mod executor;
pub mod manager;
pub mod queue;
pub mod sql;

pub use command::{Callback, Command, Statement};
pub use executor::ExecutorState;
pub use manager::{CommandManager, ExecutorStats};
pub use queue::{CommandQueue, QueueError};
