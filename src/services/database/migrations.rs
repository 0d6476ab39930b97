use anyhow::{Context, Result};
use rusqlite::Connection;

/// Checks whether a column exists on a table.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let exists: i32 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            [table, column],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to inspect columns of {}", table))?;

    Ok(exists > 0)
}

/// Adds a column if it does not already exist.
pub fn ensure_column(conn: &Connection, table: &str, column: &str, ddl: &str) -> Result<()> {
    if column_exists(conn, table, column)? {
        return Ok(());
    }

    log::info!("Migrating {}: adding column {}", table, column);
    conn.execute(ddl, [])
        .with_context(|| format!("Failed to add {}.{}", table, column))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_column_adds_once() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE events (id INTEGER PRIMARY KEY)", [])
            .unwrap();

        assert!(!column_exists(&conn, "events", "revision").unwrap());
        let ddl = "ALTER TABLE events ADD COLUMN revision INTEGER NOT NULL DEFAULT 0";
        ensure_column(&conn, "events", "revision", ddl).unwrap();
        ensure_column(&conn, "events", "revision", ddl).unwrap();
        assert!(column_exists(&conn, "events", "revision").unwrap());
    }
}
