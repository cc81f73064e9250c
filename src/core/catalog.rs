//! Catalog emission: the registry as a flat `id -> text` JSON object.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::registry::TranslationsRegistry;

/// Render the catalog with 2-space indentation, sorted keys and a trailing newline.
pub fn render(registry: &TranslationsRegistry) -> Result<String> {
    let content = serde_json::to_string_pretty(&registry.to_serializable())
        .context("Failed to serialize catalog")?;
    Ok(format!("{}\n", content))
}

/// Write the catalog to `path`, creating parent directories as needed.
pub fn write(registry: &TranslationsRegistry, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, render(registry)?)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
