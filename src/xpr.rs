//! Files referenced by an existing Vivado project (`.xpr`)

use anyhow::{Context, Result};
use roxmltree::Document;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFile {
    pub name: String,
    pub extension: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fileset: Option<String>,
}

/// Every `<File Path="...">` in document order
pub fn list_files(content: &str) -> Result<Vec<ProjectFile>> {
    let doc = Document::parse(content).context("Failed to parse Vivado project XML")?;

    let files = doc
        .descendants()
        .filter(|node| node.has_tag_name("File"))
        .filter_map(|node| {
            let path = node.attribute("Path")?;
            let fileset = node
                .ancestors()
                .find(|a| a.has_tag_name("FileSet"))
                .and_then(|set| set.attribute("Name"))
                .map(str::to_string);
            let file = Path::new(path);

            Some(ProjectFile {
                name: file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                extension: file
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default(),
                path: path.to_string(),
                fileset,
            })
        })
        .collect();

    Ok(files)
}
