// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL text generation for command statements.
//!
//! Identifiers are always double-quoted; values never appear in SQL text and
//! are bound as named parameters instead.

use banana_core::{CommandError, Record};

/// Quote an SQLite identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Named parameter for the column at `index` in an insert statement.
pub fn param_name(index: usize) -> String {
    format!(":c{index}")
}

/// SQLite accepts `""` as a table name, so blank names are refused here.
fn check_table(table: &str) -> Result<(), CommandError> {
    if table.trim().is_empty() {
        return Err(CommandError::statement_failure("table name must not be empty"));
    }
    Ok(())
}

/// `CREATE TABLE IF NOT EXISTS` with an auto-increment `ID` plus one column
/// per template entry, typed from the template value.
pub fn create_table(table: &str, template: &Record) -> Result<String, CommandError> {
    check_table(table)?;
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {}(ID INTEGER PRIMARY KEY AUTOINCREMENT",
        quote_ident(table)
    );
    for (column, value) in template.iter() {
        let column_type = value
            .column_type()
            .ok_or_else(|| CommandError::unsupported_type(column, value.type_name()))?;
        sql.push_str(&format!(", {} {column_type}", quote_ident(column)));
    }
    sql.push(')');
    Ok(sql)
}

/// Parameterized `INSERT` for the columns of `record`, in record order.
pub fn insert(table: &str, record: &Record) -> Result<String, CommandError> {
    check_table(table)?;
    if let Some((column, value)) = record.iter().find(|(_, v)| v.column_type().is_none()) {
        return Err(CommandError::unsupported_type(column, value.type_name()));
    }
    if record.is_empty() {
        return Ok(format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table)));
    }

    let columns: Vec<String> = record.columns().map(quote_ident).collect();
    let params: Vec<String> = (0..record.len()).map(param_name).collect();
    Ok(format!(
        "INSERT INTO {}({}) VALUES({})",
        quote_ident(table),
        columns.join(", "),
        params.join(", ")
    ))
}
