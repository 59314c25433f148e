// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Banana integration tests.
//!
//! - [`OutcomeRecorder`] - callbacks that capture outcomes for assertion
//! - [`TestDatabase`] - throwaway database file with matching configs

pub mod database;
pub mod recorder;

pub use database::TestDatabase;
pub use recorder::{OutcomeRecorder, Recorded};
