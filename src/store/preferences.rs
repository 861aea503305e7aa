use crate::models::TimelineScale;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

pub const TIMELINE_SCALE_KEY: &str = "timeline.scale";

/// Key/value view preferences
pub struct PreferenceRepo;

impl PreferenceRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        let value = conn
            .query_row("SELECT value FROM preferences WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read preference: {}", key))?;
        Ok(value)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO preferences (key, value, modified_ts) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, modified_ts = excluded.modified_ts",
            rusqlite::params![key, value, now],
        )
        .with_context(|| format!("Failed to save preference: {}", key))?;
        Ok(())
    }

    /// Stored timeline scale; unknown or missing values fall back to the default
    pub fn timeline_scale(conn: &Connection) -> Result<TimelineScale> {
        let stored = Self::get(conn, TIMELINE_SCALE_KEY)?;
        Ok(stored
            .as_deref()
            .and_then(TimelineScale::from_str)
            .unwrap_or_default())
    }

    pub fn set_timeline_scale(conn: &Connection, scale: TimelineScale) -> Result<()> {
        Self::set(conn, TIMELINE_SCALE_KEY, scale.as_str())
    }
}
