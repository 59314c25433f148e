// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `demo` and `submit` subcommands.
//!
//! Both start a [`CommandManager`], queue commands whose callbacks forward
//! their outcome over a channel, then shut the manager down so every queued
//! command has run before results are printed.

use std::sync::mpsc;

use banana_config::{ExecutorConfig, StorageConfig};
use banana_core::{BananaError, CommandKind, CommandOutcome, Record};
use banana_storage::{Command, CommandManager};

/// Render an outcome the way the CLI prints it.
pub fn describe(outcome: &CommandOutcome) -> String {
    match outcome {
        Ok(success) => success.to_string(),
        Err(err) => format!("Exception: {err}"),
    }
}

/// Create `BANANAS` and insert two bananas. Returns one line per command,
/// in execution order.
pub fn run_demo(
    storage: &StorageConfig,
    executor: &ExecutorConfig,
) -> Result<Vec<String>, BananaError> {
    let manager = CommandManager::start(storage, executor)?;
    let (tx, rx) = mpsc::channel::<String>();

    let banana = || {
        Record::new()
            .with("Name", "b1")
            .with("Type", "asddasdasd")
            .with("Price", 0.5)
    };

    let create_tx = tx.clone();
    submit(
        &manager,
        Command::create("BANANAS", banana(), move |outcome| {
            let _ = create_tx.send(format!("Create Result: {}", describe(&outcome)));
        }),
    )?;
    for _ in 0..2 {
        let insert_tx = tx.clone();
        submit(
            &manager,
            Command::insert("BANANAS", banana(), move |outcome| {
                let _ = insert_tx.send(format!("INSERT Result: {}", describe(&outcome)));
            }),
        )?;
    }
    drop(tx);

    manager.shutdown();
    Ok(rx.into_iter().collect())
}

/// Run a single command built from a JSON object and return its outcome.
pub fn run_single(
    storage: &StorageConfig,
    executor: &ExecutorConfig,
    kind: CommandKind,
    table: &str,
    json: &str,
) -> Result<CommandOutcome, BananaError> {
    let record = parse_record(json)?;
    let manager = CommandManager::start(storage, executor)?;
    let (tx, rx) = mpsc::channel();
    let callback = move |outcome| {
        let _ = tx.send(outcome);
    };
    let command = match kind {
        CommandKind::Create => Command::create(table, record, callback),
        CommandKind::Insert => Command::insert(table, record, callback),
    };
    submit(&manager, command)?;
    manager.shutdown();
    rx.recv()
        .map_err(|_| BananaError::Internal("executor stopped before reporting".to_string()))
}

/// Parse a JSON object into a record. Non-object input is rejected.
pub fn parse_record(json: &str) -> Result<Record, BananaError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| BananaError::Config(format!("invalid record JSON: {e}")))?;
    match value {
        serde_json::Value::Object(map) => Ok(Record::from(map)),
        other => Err(BananaError::Config(format!(
            "record must be a JSON object, got {other}"
        ))),
    }
}

fn submit(manager: &CommandManager, command: Command) -> Result<(), BananaError> {
    manager
        .submit(command)
        .map_err(|e| BananaError::Queue(e.to_string()))
}
