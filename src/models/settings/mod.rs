// Settings module
// Grid geometry and storage locations read from config.toml

use serde::{Deserialize, Serialize};

/// Runtime configuration of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width of one slot column in points.
    pub slot_width: f32,
    /// Height of one row in points.
    pub row_height: f32,
    /// Width of the row header column.
    pub header_width: f32,
    /// Pointer travel before a press on an event becomes a drag.
    pub drag_threshold_px: f32,
    /// Width of the resize handles at both ends of a bar.
    pub handle_width: f32,
    /// Owner ids per store query.
    pub owner_batch_size: usize,
    /// Overrides the database location.
    pub database_path: Option<String>,
    /// Overrides the paste history location.
    pub paste_history_path: Option<String>,
    /// User shown in the month view on startup.
    pub default_user: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            slot_width: 14.0,
            row_height: 34.0,
            header_width: 110.0,
            drag_threshold_px: 4.0,
            handle_width: 9.0,
            owner_batch_size: 10,
            database_path: None,
            paste_history_path: None,
            default_user: None,
        }
    }
}

impl GridConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.slot_width <= 0.0 || self.row_height <= 0.0 {
            return Err("Slot width and row height must be positive".to_string());
        }
        if self.drag_threshold_px < 0.0 {
            return Err("Drag threshold cannot be negative".to_string());
        }
        if self.handle_width * 2.0 > self.slot_width * 4.0 {
            return Err("Resize handles cannot be wider than half an hour".to_string());
        }
        if self.owner_batch_size == 0 {
            return Err("Owner batch size must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drag_threshold_px, 4.0);
        assert_eq!(config.owner_batch_size, 10);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: GridConfig = toml::from_str("slot_width = 20.0\n").unwrap();
        assert_eq!(config.slot_width, 20.0);
        assert_eq!(config.row_height, GridConfig::default().row_height);
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let config = GridConfig {
            owner_batch_size: 0,
            ..GridConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
