use super::{DirEntry, FileSystem, FileType};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = if path.is_file() {
                FileType::File
            } else if path.is_dir() {
                FileType::Directory
            } else {
                FileType::Symlink
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }
        result.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(result)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        path.canonicalize()
            .context(format!("Failed to canonicalize path {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).context(format!("Failed to write file {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).context(format!("Failed to create directory {:?}", path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).context(format!("Failed to remove directory {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("rtl")).unwrap();
        fs::write(base.join("rtl/top.vhd"), "entity top is end;").unwrap();
        fs::write(base.join("pins.xdc"), "").unwrap();

        dir
    }

    #[test]
    fn test_exists_and_kinds() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.exists(temp.path()));
        assert!(fs.is_dir(&temp.path().join("rtl")));
        assert!(fs.is_file(&temp.path().join("rtl/top.vhd")));
        assert!(!fs.exists(&temp.path().join("missing.vhd")));
    }

    #[test]
    fn test_read_dir_is_sorted() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let entries = fs.read_dir(temp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();
        assert_eq!(names, vec!["pins.xdc", "rtl"]);
    }

    #[test]
    fn test_write_create_remove() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let build = temp.path().join("build/vivado");

        fs.create_dir_all(&build).unwrap();
        fs.write(&build.join("project.tcl"), "puts hi\n").unwrap();
        assert!(fs.has_entries(&build));
        assert_eq!(
            fs.read_to_string(&build.join("project.tcl")).unwrap(),
            "puts hi\n"
        );

        fs.remove_dir_all(&build).unwrap();
        assert!(!fs.exists(&build));
    }

    #[test]
    fn test_canonicalize() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let canonical = fs.canonicalize(&temp.path().join("rtl/../pins.xdc")).unwrap();
        assert!(canonical.is_absolute());
        assert!(canonical.ends_with("pins.xdc"));
    }
}
