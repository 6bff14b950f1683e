//! The last generated plan, kept between invocations.
//!
//! `genexium plan` stores the plan it just received so that a later
//! `genexium workout` (or a resumed dashboard) has something to build on.
//! Only one plan is kept; each successful generation replaces it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use genexium_core::controller::StoredPlan;

use crate::config;

/// Default location of the stored plan.
pub fn last_plan_path() -> PathBuf {
    config::config_dir().join("last_plan.json")
}

pub fn save_plan(plan: &StoredPlan, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(plan).context("failed to serialize plan")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write plan to {}", path.display()))?;
    tracing::debug!(path = %path.display(), "stored last plan");
    Ok(())
}

/// Load the stored plan. `Ok(None)` when nothing has been stored yet.
pub fn load_plan(path: &Path) -> Result<Option<StoredPlan>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read plan at {}", path.display()));
        }
    };
    let plan = serde_json::from_str(&contents)
        .with_context(|| format!("stored plan at {} is corrupt", path.display()))?;
    Ok(Some(plan))
}
