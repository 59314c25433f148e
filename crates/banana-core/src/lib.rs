// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Banana command queue.
//!
//! Provides the typed values and records commands carry, the outcome type
//! delivered to command callbacks, and the error types used across the
//! workspace.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BananaError, CommandError, CommandErrorKind};
pub use types::{ColumnType, CommandKind, CommandOutcome, CommandSuccess, Record, Value};
