use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Writes a document as pretty-printed UTF-8 JSON, replacing any previous
/// file at the same path.
pub fn write_pretty<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    Ok(())
}
