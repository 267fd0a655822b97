//! FileSystem trait definition

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Type of file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

/// A directory entry returned by read_dir
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub file_type: FileType,
}

impl DirEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.name
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }
}

/// Abstraction over the file operations the engine performs
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// List directory contents
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Resolve symlinks; the path must exist
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Write a whole file, replacing any previous content
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// True when `path` is a directory with at least one entry
    fn has_entries(&self, path: &Path) -> bool {
        self.is_dir(path)
            && self
                .read_dir(path)
                .map(|entries| !entries.is_empty())
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_entry() {
        let entry = DirEntry {
            path: PathBuf::from("/repo/rtl/top.vhd"),
            name: "top.vhd".to_string(),
            file_type: FileType::File,
        };
        assert_eq!(entry.path(), Path::new("/repo/rtl/top.vhd"));
        assert_eq!(entry.file_name(), "top.vhd");
        assert_eq!(entry.file_type(), FileType::File);
    }
}
