// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Banana - a single-writer SQLite command queue.
//!
//! This binary drives the queue from the command line.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod demo;

use std::path::PathBuf;

use banana_config::BananaConfig;
use banana_core::CommandKind;
use clap::{Parser, Subcommand, ValueEnum};

/// Banana - a single-writer SQLite command queue.
#[derive(Parser, Debug)]
#[command(name = "banana", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create BANANAS and insert two rows, printing each outcome.
    Demo,
    /// Queue one command and print its outcome.
    Submit {
        #[arg(value_enum)]
        kind: KindArg,
        /// Target table.
        table: String,
        /// Column values as a JSON object.
        record: String,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Create,
    Insert,
}

impl From<KindArg> for CommandKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Create => CommandKind::Create,
            KindArg::Insert => CommandKind::Insert,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => banana_config::load_and_validate_path(path),
        None => banana_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            banana_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);
    tracing::debug!(
        database = %config.storage.database_path,
        capacity = ?config.executor.queue_capacity,
        "config loaded"
    );

    let code = match cli.command {
        Some(Commands::Demo) => run_demo(&config),
        Some(Commands::Submit {
            kind,
            table,
            record,
        }) => run_submit(&config, kind.into(), &table, &record),
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("banana: use --help for available commands");
            0
        }
    };
    std::process::exit(code);
}

fn run_demo(config: &BananaConfig) -> i32 {
    match demo::run_demo(&config.storage, &config.executor) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}

fn run_submit(config: &BananaConfig, kind: CommandKind, table: &str, record: &str) -> i32 {
    match demo::run_single(&config.storage, &config.executor, kind, table, record) {
        Ok(outcome) => {
            println!("{}", demo::describe(&outcome));
            i32::from(outcome.is_err())
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}

fn print_config(config: &BananaConfig) -> i32 {
    match toml::to_string_pretty(config) {
        Ok(text) => {
            print!("{text}");
            0
        }
        Err(e) => {
            eprintln!("error: failed to render config: {e}");
            1
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "banana={log_level},banana_storage={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();
}
