//! Maintenance tool for the file-backed draft store.

pub mod cli;
pub mod commands;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use cms_core::config::DraftConfig;
use cms_drafts::{DraftStore, FileStore};

/// Default location of the draft file when `DRAFT_STORE_PATH` is unset.
pub const DEFAULT_STORE_PATH: &str = "./drafts.json";

/// Open the draft store at `path` with configuration from the environment.
pub fn open_store(path: &Path) -> anyhow::Result<DraftStore> {
    let config = DraftConfig::from_env().context("Invalid draft configuration")?;
    let file = FileStore::open(path)
        .with_context(|| format!("Failed to open draft store at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Opened draft store");
    Ok(DraftStore::with_config(Arc::new(file), config))
}
