// Paste history persistence
// Copy counts survive restarts in a small JSON file next to the database

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::clipboard::{PasteEntry, PasteHistory};

pub const PASTE_HISTORY_FILE: &str = "paste_history.json";

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PasteHistorySnapshot {
    version: u32,
    #[serde(default)]
    entries: Vec<PasteEntry>,
}

/// Load the history; a missing file is an empty history.
pub fn load_history(path: &Path) -> Result<PasteHistory> {
    if !path.exists() {
        return Ok(PasteHistory::new());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read paste history from {}", path.display()))?;
    let snapshot: PasteHistorySnapshot = serde_json::from_str(&data).with_context(|| {
        format!("failed to deserialize paste history from {}", path.display())
    })?;
    if snapshot.version > SNAPSHOT_VERSION {
        log::warn!(
            "Paste history {} has version {}, newer than {}",
            path.display(),
            snapshot.version,
            SNAPSHOT_VERSION
        );
    }
    Ok(PasteHistory::from_entries(snapshot.entries))
}

pub fn save_history(path: &Path, history: &PasteHistory) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }

    let snapshot = PasteHistorySnapshot {
        version: SNAPSHOT_VERSION,
        entries: history.entries(),
    };
    let data = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, data)
        .with_context(|| format!("failed to write paste history to {}", path.display()))?;
    Ok(())
}
