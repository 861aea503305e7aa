use rusqlite::{Connection, Result};
use std::collections::HashMap;

/// Current local schema version
const CURRENT_VERSION: u32 = 2;

type Migration = fn(&rusqlite::Transaction) -> Result<()>;

/// Migration system for the local state database
pub struct MigrationManager;

impl MigrationManager {
    /// Create the schema_version table and apply every missing migration
    pub fn initialize(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )?;

        let current_version = Self::get_version(conn)?;
        for version in (current_version + 1)..=CURRENT_VERSION {
            Self::apply_migration(conn, version)?;
        }

        Ok(())
    }

    /// Apply one migration inside its own transaction
    fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
        let migrations = get_migrations();
        let migration = migrations.get(&version).ok_or_else(|| {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(format!("No migration found for version {}", version)),
            )
        })?;

        let tx = conn.unchecked_transaction()?;
        migration(&tx)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
        tx.commit()?;

        log::debug!("applied local schema migration v{}", version);
        Ok(())
    }

    pub fn get_version(conn: &Connection) -> Result<u32> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }
}

fn get_migrations() -> HashMap<u32, Migration> {
    let mut migrations: HashMap<u32, Migration> = HashMap::new();
    migrations.insert(1, migration_v1);
    migrations.insert(2, migration_v2);
    migrations
}

/// Migration v1: view preferences
fn migration_v1(tx: &rusqlite::Transaction) -> Result<()> {
    tx.execute(
        "CREATE TABLE preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Migration v2: unsent stage date edits, one per (project, stage)
fn migration_v2(tx: &rusqlite::Transaction) -> Result<()> {
    tx.execute(
        "CREATE TABLE pending_changes (
            project_id INTEGER NOT NULL CHECK(project_id > 0),
            stage_id TEXT NOT NULL,
            mode TEXT NOT NULL CHECK(mode IN ('estimate','actual')),
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_ts INTEGER NOT NULL,
            PRIMARY KEY(project_id, stage_id),
            CHECK(start_date <= end_date)
        )",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_pending_changes_created ON pending_changes(project_id, created_ts)",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationManager::initialize(&conn).unwrap();
        assert_eq!(MigrationManager::get_version(&conn).unwrap(), CURRENT_VERSION);

        for table in ["preferences", "pending_changes"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationManager::initialize(&conn).unwrap();
        MigrationManager::initialize(&conn).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, CURRENT_VERSION as i64);
    }

    #[test]
    fn test_upgrade_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE schema_version (version INTEGER PRIMARY KEY)", []).unwrap();
        let tx = conn.unchecked_transaction().unwrap();
        migration_v1(&tx).unwrap();
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", []).unwrap();
        tx.commit().unwrap();
        conn.execute(
            "INSERT INTO preferences (key, value, modified_ts) VALUES ('timeline.scale', 'Month', 1)",
            [],
        )
        .unwrap();

        MigrationManager::initialize(&conn).unwrap();
        assert_eq!(MigrationManager::get_version(&conn).unwrap(), 2);
        let value: String = conn
            .query_row("SELECT value FROM preferences WHERE key = 'timeline.scale'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, "Month");
    }
}
