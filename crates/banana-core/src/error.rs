// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Banana command queue.

use strum::Display;
use thiserror::Error;

/// Setup-time error used across crates (config loading, executor startup).
///
/// Failures that happen while a command executes never surface as this type;
/// they are delivered to the command's callback as a [`CommandError`].
#[derive(Debug, Error)]
pub enum BananaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, pragma setup).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The command queue rejected an operation.
    #[error("queue error: {0}")]
    Queue(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Classification of command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CommandErrorKind {
    /// A record value has no column-type mapping.
    UnsupportedType,
    /// The store rejected the statement, or no connection could be opened.
    StatementExecutionFailure,
    /// A panic escaped command execution. Never delivered to a callback; the
    /// executor logs it and stops.
    FatalExecutorFault,
}

/// A structured command failure delivered through the command callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: CommandErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A value of type `type_name` in `column` cannot be stored.
    pub fn unsupported_type(column: &str, type_name: &str) -> Self {
        Self::new(
            CommandErrorKind::UnsupportedType,
            format!("type {type_name} not supported for column {column}"),
        )
    }

    /// The store failed with `cause`.
    pub fn statement_failure(cause: impl std::fmt::Display) -> Self {
        Self::new(CommandErrorKind::StatementExecutionFailure, cause.to_string())
    }

    pub fn is_unsupported_type(&self) -> bool {
        self.kind == CommandErrorKind::UnsupportedType
    }

    pub fn is_statement_failure(&self) -> bool {
        self.kind == CommandErrorKind::StatementExecutionFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_display_includes_kind_and_cause() {
        let err = CommandError::statement_failure("no such table: BANANAS");
        assert_eq!(
            err.to_string(),
            "StatementExecutionFailure: no such table: BANANAS"
        );
        assert!(err.is_statement_failure());
        assert!(!err.is_unsupported_type());
    }

    #[test]
    fn unsupported_type_names_column_and_type() {
        let err = CommandError::unsupported_type("Tags", "array");
        assert!(err.is_unsupported_type());
        assert!(err.message.contains("Tags"));
        assert!(err.message.contains("array"));
    }

    #[test]
    fn banana_error_variants_render() {
        let storage = BananaError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert_eq!(storage.to_string(), "storage error: disk gone");
        assert_eq!(
            BananaError::Queue("closed".into()).to_string(),
            "queue error: closed"
        );
    }
}
