// Template model
// Reusable (title, color) pairs offered when creating entries

use serde::{Deserialize, Serialize};

use crate::models::event::validate_color;

/// Colors offered by the entry and template forms.
pub const PALETTE: [&str; 36] = [
    "#1976d2", "#43a047", "#f44336", "#e91e63", "#9c27b0", "#673ab7", "#3f51b5", "#2196f3",
    "#03a9f4", "#00bcd4", "#009688", "#4caf50", "#8bc34a", "#cddc39", "#ffeb3b", "#ffc107",
    "#ff9800", "#ff5722", "#795548", "#607d8b", "#c2185b", "#7b1fa2", "#512da8", "#0288d1",
    "#0097a7", "#388e3c", "#689f38", "#afb42b", "#fbc02d", "#ffa000", "#f57c00", "#e64a19",
    "#5d4037", "#455a64", "#6d4c41", "#00acc1",
];

/// Color preselected in new-entry forms.
pub const DEFAULT_COLOR: &str = PALETTE[0];

/// Entry template for quick creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: Option<i64>,
    pub title: String,
    pub color: String,
}

impl Template {
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            color: color.into(),
        }
    }

    /// Create a builder for constructing templates
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::new()
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Template title cannot be empty".to_string());
        }
        validate_color(&self.color)
    }
}

/// Builder for creating templates
#[derive(Default)]
pub struct TemplateBuilder {
    title: Option<String>,
    color: Option<String>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn build(self) -> Result<Template, String> {
        let title = self.title.ok_or("Template title is required")?;
        let template = Template {
            id: None,
            title,
            color: self.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        };
        template.validate()?;
        Ok(template)
    }
}
