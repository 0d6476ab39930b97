// Template service
// Read-only template list for the grid plus SQLite CRUD for managing it

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::template::Template;

/// Source of the (title, color) templates offered in the selection menu.
pub trait TemplateProvider {
    fn templates(&self) -> Result<Vec<Template>>;
}

/// Fixed template list.
impl TemplateProvider for Vec<Template> {
    fn templates(&self) -> Result<Vec<Template>> {
        Ok(self.clone())
    }
}

pub struct TemplateService<'a> {
    conn: &'a Connection,
}

impl<'a> TemplateService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new template
    pub fn create(&self, template: Template) -> Result<Template> {
        template.validate().map_err(|e| anyhow::anyhow!(e))?;

        self.conn
            .execute(
                "INSERT INTO templates (title, color) VALUES (?1, ?2)",
                params![template.title.trim(), template.color],
            )
            .context("Failed to insert template")?;

        let id = self.conn.last_insert_rowid();
        self.get_by_id(id)
    }

    /// Get a template by ID
    pub fn get_by_id(&self, id: i64) -> Result<Template> {
        self.conn
            .query_row(
                "SELECT id, title, color FROM templates WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Template {
                        id: Some(row.get(0)?),
                        title: row.get(1)?,
                        color: row.get(2)?,
                    })
                },
            )
            .context("Template not found")
    }

    /// Get all templates ordered by title
    pub fn list_all(&self) -> Result<Vec<Template>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, color FROM templates ORDER BY title ASC, id ASC")?;

        let templates = stmt.query_map([], |row| {
            Ok(Template {
                id: Some(row.get(0)?),
                title: row.get(1)?,
                color: row.get(2)?,
            })
        })?;

        templates
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to fetch templates")
    }

    /// Delete a template by ID
    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM templates WHERE id = ?1", params![id])
            .context("Failed to delete template")?;

        Ok(())
    }
}

impl TemplateProvider for TemplateService<'_> {
    fn templates(&self) -> Result<Vec<Template>> {
        self.list_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;

    #[test]
    fn test_create_and_list_sorted() {
        let db = Database::in_memory().unwrap();
        let service = TemplateService::new(db.connection());

        service.create(Template::new("Review", "#43a047")).unwrap();
        service.create(Template::new("Lunch", "#ff9800")).unwrap();

        let titles: Vec<String> = service
            .templates()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Lunch", "Review"]);
    }

    #[test]
    fn test_create_rejects_invalid() {
        let db = Database::in_memory().unwrap();
        let service = TemplateService::new(db.connection());
        assert!(service.create(Template::new("", "#43a047")).is_err());
        assert!(service.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let db = Database::in_memory().unwrap();
        let service = TemplateService::new(db.connection());
        let created = service.create(Template::new("Review", "#43a047")).unwrap();

        service.delete(created.id.unwrap()).unwrap();
        assert!(service.get_by_id(created.id.unwrap()).is_err());
    }

    #[test]
    fn test_static_provider() {
        let provider = vec![Template::new("Standup", "#1976d2")];
        assert_eq!(provider.templates().unwrap().len(), 1);
    }
}
