//! Operator-run maintenance against the backend's PostgreSQL database.
//!
//! Nothing here is on the request path of the running application. Each
//! run holds exactly one connection and closes it on every exit path after
//! it was acquired.

pub mod postgres;

pub use postgres::PgAdmin;

use crate::config::DbConfig;
use crate::error::AppError;
use log::{info, warn};
use std::fmt;
use std::io::Write;

const MAX_IDENTIFIER_LEN: usize = 63;

/// Connection-level operations a maintenance run needs
#[allow(async_fn_in_trait)]
pub trait AdminDatabase {
    /// Round-trip to the server
    async fn verify(&mut self) -> Result<(), AppError>;

    async fn execute(&mut self, sql: &str) -> Result<(), AppError>;

    async fn close(self) -> Result<(), AppError>;
}

/// Table name checked to be a plain (optionally schema-qualified) identifier,
/// so it can be spliced into DDL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: &str) -> Result<Self, AppError> {
        let name = name.trim();
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() > 2 || parts.iter().any(|p| !is_identifier(p)) {
            return Err(AppError::Validation(format!(
                "Invalid table name: '{}'. Use letters, digits and underscores, optionally prefixed by a schema (schema.table).",
                name
            )));
        }
        Ok(TableName(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE;", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    part.len() <= MAX_IDENTIFIER_LEN && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// Operator log lines are best effort; a closed stdout must not abort the run.
fn report(out: &mut dyn Write, message: &str) {
    let _ = writeln!(out, "{}", message);
}

async fn drop_steps<D: AdminDatabase>(db: &mut D, table: &TableName, out: &mut dyn Write) -> Result<(), AppError> {
    db.verify().await?;
    report(out, "Connected successfully.");
    info!("connection verified");

    report(out, &format!("Dropping {} table...", table));
    let statement = table.drop_statement();
    info!("executing: {}", statement);
    db.execute(&statement).await?;
    report(out, &format!("Table {} dropped successfully.", table));
    Ok(())
}

/// Verify, drop `table` if it exists, then close `db` whatever happened.
///
/// When both the drop and the close fail, the drop error is returned and the
/// close error is logged.
pub async fn drop_table<D: AdminDatabase>(mut db: D, table: &TableName, out: &mut dyn Write) -> Result<(), AppError> {
    let outcome = drop_steps(&mut db, table, out).await;
    let closed = db.close().await;
    info!("connection closed");

    match (outcome, closed) {
        (Ok(()), closed) => closed,
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!("failed to close connection after error: {}", close_err);
            Err(err)
        }
    }
}

/// Full run against PostgreSQL: connect with `config`, then [`drop_table`]
pub async fn run_drop_table(config: &DbConfig, table: &TableName, out: &mut dyn Write) -> Result<(), AppError> {
    report(out, "Connecting to database...");
    info!(
        "connecting to {}:{}/{} as {}",
        config.host, config.port, config.database, config.user
    );
    let db = PgAdmin::connect(config).await?;
    drop_table(db, table, out).await
}
