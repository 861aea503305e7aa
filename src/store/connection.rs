use crate::store::migrations::MigrationManager;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Local state database connection manager
pub struct LocalStore;

impl LocalStore {
    /// Open the database at `path`, creating it and parent directories if needed
    pub fn connect(path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        MigrationManager::initialize(&conn).context("Failed to initialize database schema")?;

        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;

        MigrationManager::initialize(&conn).context("Failed to initialize database schema")?;

        Ok(conn)
    }
}
