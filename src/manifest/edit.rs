//! In-place manifest edits

use super::schema::SourceEntry;
use crate::error::ManifestError;
use crate::fs::FileSystem;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new `[[sources]]` entry was appended
    Added,
    /// An existing entry was enabled for the tool
    Extended,
    /// The entry was already active for the tool
    Unchanged,
}

/// Register `source` for `tool`, creating the entry when the path is new.
///
/// The manifest is re-serialized, so comments and key order outside the
/// typed tables are not preserved.
pub fn add_source(
    manifest: &Path,
    tool: &str,
    source: &str,
    fileset: Option<&str>,
    fs: &dyn FileSystem,
) -> Result<AddOutcome, ManifestError> {
    if !fs.is_file(manifest) {
        return Err(ManifestError::NotFound(manifest.to_path_buf()));
    }
    let content = fs.read_to_string(manifest).map_err(|e| ManifestError::Io {
        path: manifest.to_path_buf(),
        message: e.to_string(),
    })?;
    let parse_error = |message: String| ManifestError::Parse {
        path: manifest.to_path_buf(),
        message,
    };

    let mut document: toml::Table = toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
    if !document.contains_key(&format!("{}_settings", tool)) {
        warn!(tool, "manifest has no settings block for this tool");
    }

    let mut sources: Vec<SourceEntry> = match document.remove("sources") {
        Some(value) => value.try_into().map_err(|e: toml::de::Error| parse_error(e.to_string()))?,
        None => Vec::new(),
    };

    let outcome = match sources.iter_mut().find(|entry| entry.path == source) {
        Some(entry) if entry.is_active_for(tool) => AddOutcome::Unchanged,
        Some(entry) => {
            entry.tools.insert(tool.to_string(), true);
            if entry.fileset.is_none() {
                entry.fileset = fileset.map(str::to_string);
            }
            AddOutcome::Extended
        }
        None => {
            let mut entry = SourceEntry::new(source);
            entry.tools.insert(tool.to_string(), true);
            entry.fileset = fileset.map(str::to_string);
            sources.push(entry);
            AddOutcome::Added
        }
    };

    if outcome == AddOutcome::Unchanged {
        return Ok(outcome);
    }

    let value = toml::Value::try_from(&sources)
        .map_err(|e| ManifestError::Invalid(format!("cannot serialize sources: {}", e)))?;
    document.insert("sources".to_string(), value);
    let rendered = toml::to_string(&document)
        .map_err(|e| ManifestError::Invalid(format!("cannot serialize manifest: {}", e)))?;

    fs.write(manifest, &rendered).map_err(|e| ManifestError::Io {
        path: manifest.to_path_buf(),
        message: e.to_string(),
    })?;
    info!(manifest = %manifest.display(), tool, source, outcome = ?outcome, "updated manifest sources");

    Ok(outcome)
}
