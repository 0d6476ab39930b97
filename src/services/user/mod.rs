// User service
// Ordered user directory backing the day-view rows

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::row::User;

pub struct UserService<'a> {
    conn: &'a Connection,
}

impl<'a> UserService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Users in display order.
    pub fn list_ordered(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, sort_order FROM users ORDER BY sort_order ASC, id ASC")?;

        let users = stmt.query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                order: row.get(2)?,
            })
        })?;

        users
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to fetch users")
    }

    pub fn get(&self, id: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, name, sort_order FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        order: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("Failed to load user")
    }

    /// Insert or replace a user.
    pub fn upsert(&self, user: &User) -> Result<()> {
        user.validate().map_err(|e| anyhow::anyhow!(e))?;

        self.conn
            .execute(
                "INSERT INTO users (id, name, sort_order) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name, sort_order = excluded.sort_order",
                params![user.id, user.name.trim(), user.order],
            )
            .with_context(|| format!("Failed to save user {}", user.id))?;

        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .context("Failed to count users")
    }
}
