// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database mutation commands.
//!
//! A [`Command`] pairs a statement (create-table or insert) with the callback
//! that receives its outcome. Commands are consumed by execution, so each one
//! runs and reports exactly once.

use std::fmt;

use banana_core::{CommandError, CommandKind, CommandOutcome, CommandSuccess, Record, Value};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;

use crate::sql;

/// Caller-supplied outcome handler. Runs on the executor thread.
pub type Callback = Box<dyn FnOnce(CommandOutcome) + Send + 'static>;

/// The statement a command runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Create `table` if missing, with column types inferred from `template`.
    Create { table: String, template: Record },
    /// Append one row built from `record` to `table`.
    Insert { table: String, record: Record },
}

impl Statement {
    pub fn kind(&self) -> CommandKind {
        match self {
            Statement::Create { .. } => CommandKind::Create,
            Statement::Insert { .. } => CommandKind::Insert,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Statement::Create { table, .. } | Statement::Insert { table, .. } => table,
        }
    }

    /// Run the statement against `conn`. Failures come back as values.
    pub fn run(&self, conn: &Connection) -> CommandOutcome {
        let rows_affected = match self {
            Statement::Create { table, template } => {
                let text = sql::create_table(table, template)?;
                conn.execute(&text, [])
                    .map_err(CommandError::statement_failure)?
            }
            Statement::Insert { table, record } => {
                let text = sql::insert(table, record)?;
                let names: Vec<String> = (0..record.len()).map(sql::param_name).collect();
                let values: Vec<ToSqlOutput<'_>> = record
                    .iter()
                    .map(|(_, v)| ToSqlOutput::Borrowed(value_ref(v)))
                    .collect();
                let params: Vec<(&str, &dyn ToSql)> = names
                    .iter()
                    .map(String::as_str)
                    .zip(values.iter().map(|v| v as &dyn ToSql))
                    .collect();
                conn.execute(&text, params.as_slice())
                    .map_err(CommandError::statement_failure)?
            }
        };
        Ok(CommandSuccess {
            kind: self.kind(),
            table: self.table().to_string(),
            rows_affected,
        })
    }
}

/// Borrow a storable value for binding. Unsupported values are rejected
/// before binding, so they never reach this point with meaningful data.
fn value_ref(value: &Value) -> ValueRef<'_> {
    match value {
        Value::Integer(i) => ValueRef::Integer(*i),
        Value::Real(r) => ValueRef::Real(*r),
        Value::Text(s) => ValueRef::Text(s.as_bytes()),
        Value::Blob(b) => ValueRef::Blob(b),
        Value::Unsupported(_) => ValueRef::Null,
    }
}

/// One database mutation request with its result callback.
pub struct Command {
    statement: Statement,
    callback: Callback,
}

impl Command {
    pub fn new(
        statement: Statement,
        callback: impl FnOnce(CommandOutcome) + Send + 'static,
    ) -> Self {
        Self {
            statement,
            callback: Box::new(callback),
        }
    }

    /// Create `table` with column types inferred from `template`.
    pub fn create(
        table: impl Into<String>,
        template: Record,
        callback: impl FnOnce(CommandOutcome) + Send + 'static,
    ) -> Self {
        Self::new(
            Statement::Create {
                table: table.into(),
                template,
            },
            callback,
        )
    }

    /// Insert `record` as a new row of `table`.
    pub fn insert(
        table: impl Into<String>,
        record: Record,
        callback: impl FnOnce(CommandOutcome) + Send + 'static,
    ) -> Self {
        Self::new(
            Statement::Insert {
                table: table.into(),
                record,
            },
            callback,
        )
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn kind(&self) -> CommandKind {
        self.statement.kind()
    }

    pub fn table(&self) -> &str {
        self.statement.table()
    }

    /// Run the statement without reporting. Pair with [`Command::report`].
    pub fn run(&self, conn: &Connection) -> CommandOutcome {
        self.statement.run(conn)
    }

    /// Deliver `outcome` to the callback, consuming the command.
    pub fn report(self, outcome: CommandOutcome) {
        (self.callback)(outcome)
    }

    /// Run against `conn` and report the outcome.
    pub fn execute(self, conn: &Connection) {
        let outcome = self.run(conn);
        self.report(outcome);
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("statement", &self.statement)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn banana() -> Record {
        Record::new()
            .with("Name", "b1")
            .with("Type", "x")
            .with("Price", 0.5)
    }

    fn run_command(
        conn: &Connection,
        build: impl FnOnce(mpsc::Sender<CommandOutcome>) -> Command,
    ) -> CommandOutcome {
        let (tx, rx) = mpsc::channel();
        build(tx).execute(conn);
        rx.try_recv().expect("callback should fire synchronously during execute")
    }

    fn create(conn: &Connection, table: &str, template: Record) -> CommandOutcome {
        run_command(conn, |tx| {
            Command::create(table, template, move |o| {
                let _ = tx.send(o);
            })
        })
    }

    fn insert(conn: &Connection, table: &str, record: Record) -> CommandOutcome {
        run_command(conn, |tx| {
            Command::insert(table, record, move |o| {
                let _ = tx.send(o);
            })
        })
    }

    fn row_count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", sql::quote_ident(table)),
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn create_then_insert_stores_typed_row() {
        let conn = Connection::open_in_memory().unwrap();
        let created = create(&conn, "BANANAS", banana()).unwrap();
        assert_eq!(created.to_string(), "Table BANANAS created.");

        let inserted = insert(&conn, "BANANAS", banana()).unwrap();
        assert_eq!(inserted.to_string(), "Insert Success");
        assert_eq!(inserted.rows_affected, 1);

        let (name, price): (String, f64) = conn
            .query_row("SELECT Name, Price FROM BANANAS WHERE ID = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(name, "b1");
        assert_eq!(price, 0.5);
    }

    #[test]
    fn create_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn, "BANANAS", banana()).unwrap();
        insert(&conn, "BANANAS", banana()).unwrap();
        create(&conn, "BANANAS", banana()).unwrap();
        assert_eq!(row_count(&conn, "BANANAS"), 1);
    }

    #[test]
    fn insert_into_missing_table_reports_statement_failure() {
        let conn = Connection::open_in_memory().unwrap();
        let err = insert(&conn, "NOPE", banana()).unwrap_err();
        assert!(err.is_statement_failure());
        assert!(err.message.contains("NOPE"), "cause should name the table: {err}");
    }

    #[test]
    fn create_with_unsupported_value_creates_nothing() {
        let conn = Connection::open_in_memory().unwrap();
        let template = banana().with("Origin", Value::Unsupported("object".into()));
        let err = create(&conn, "BANANAS", template).unwrap_err();
        assert!(err.is_unsupported_type());

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'BANANAS'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn insert_with_unsupported_value_reports_unsupported_type() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn, "BANANAS", banana()).unwrap();
        let record = banana().with("Price", Value::Unsupported("bool".into()));
        assert!(insert(&conn, "BANANAS", record).unwrap_err().is_unsupported_type());
        assert_eq!(row_count(&conn, "BANANAS"), 0);
    }

    #[test]
    fn values_are_bound_not_interpolated() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn, "BANANAS", banana()).unwrap();
        let hostile = banana().with("Name", "x'); DROP TABLE BANANAS; --");
        insert(&conn, "BANANAS", hostile).unwrap();
        let name: String = conn
            .query_row("SELECT Name FROM BANANAS", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "x'); DROP TABLE BANANAS; --");
    }

    #[test]
    fn blob_and_integer_columns_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        let template = Record::new().with("Stock", 0).with("Photo", vec![0u8]);
        create(&conn, "CRATES", template).unwrap();
        let row = Record::new().with("Stock", 42).with("Photo", vec![0xca, 0xfe]);
        insert(&conn, "CRATES", row).unwrap();
        let (stock, photo): (i64, Vec<u8>) = conn
            .query_row("SELECT Stock, Photo FROM CRATES", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(stock, 42);
        assert_eq!(photo, vec![0xca, 0xfe]);
    }

    #[test]
    fn unique_constraint_violation_is_reported() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE TAGS(ID INTEGER PRIMARY KEY, Label TEXT UNIQUE)")
            .unwrap();
        insert(&conn, "TAGS", Record::new().with("Label", "ripe")).unwrap();
        let err = insert(&conn, "TAGS", Record::new().with("Label", "ripe")).unwrap_err();
        assert!(err.is_statement_failure());
        assert!(err.message.contains("UNIQUE"));
    }

    #[test]
    fn blank_table_name_is_reported_and_nothing_is_created() {
        let conn = Connection::open_in_memory().unwrap();
        let err = create(&conn, "", Record::new().with("a", 1)).unwrap_err();
        assert!(err.is_statement_failure());
        let tables: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn debug_omits_callback() {
        let command = Command::insert("T", Record::new(), |_| {});
        let rendered = format!("{command:?}");
        assert!(rendered.contains("Insert"));
        assert_eq!(command.kind(), CommandKind::Insert);
        assert_eq!(command.table(), "T");
    }
}
