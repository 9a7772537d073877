use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write any serializable document as pretty-printed JSON
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}
