//! CLI command implementations.

pub mod config;
pub mod generate;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result};
use enumtab_core::Manifest;

/// Read and parse a declaration manifest.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    Manifest::from_json_str(&contents)
        .with_context(|| format!("Failed to parse manifest: {}", path.display()))
}
