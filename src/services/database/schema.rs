use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_users_table(conn)?;
    create_events_table(conn)?;
    run_event_migrations(conn)?;
    create_event_indexes(conn)?;
    create_templates_table(conn)?;
    Ok(())
}

fn create_users_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create users table")?;

    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            month TEXT NOT NULL,
            day INTEGER NOT NULL,
            start_idx INTEGER NOT NULL CHECK (start_idx BETWEEN 0 AND 95),
            end_idx INTEGER NOT NULL CHECK (end_idx BETWEEN 0 AND 95),
            title TEXT NOT NULL,
            color TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (start_idx <= end_idx)
        )",
        [],
    )
    .context("Failed to create events table")?;

    Ok(())
}

/// Databases created before revisions were tracked lack the column.
fn run_event_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "revision",
        "ALTER TABLE events ADD COLUMN revision INTEGER NOT NULL DEFAULT 0",
    )
}

fn create_event_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_user_date ON events(user_id, date)",
        [],
    )
    .context("Failed to create date index")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_user_month ON events(user_id, month)",
        [],
    )
    .context("Failed to create month index")?;

    Ok(())
}

fn create_templates_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS templates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            color TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create templates table")?;

    Ok(())
}
