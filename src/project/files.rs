//! Transactional file access for project files.
//!
//! Every write goes to a temporary sibling first and is then renamed over
//! the target, so a failure part-way through leaves either the old or the
//! new content on disk, never a mix. There is no grouping across files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

/// File operations the installer needs.
pub trait FileStore {
    /// Check whether a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read a file as UTF-8.
    fn read(&self, path: &Path) -> Result<String>;

    /// Create (or replace) a file with the given contents.
    fn create_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Open an existing file for a read-modify-write cycle.
    ///
    /// Nothing is written until [`MutableFile::commit`] is called; dropping
    /// the handle leaves the file as it was.
    fn update_file(&self, path: &Path) -> Result<MutableFile>;

    /// Create a directory and any missing parents.
    fn create_directory(&self, path: &Path) -> Result<()>;
}

/// An open read-modify-write handle on an existing file.
#[derive(Debug)]
#[must_use = "changes are only written by commit()"]
pub struct MutableFile {
    path: PathBuf,
    original: String,
}

impl MutableFile {
    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Contents at the time the file was opened.
    pub fn contents(&self) -> &str {
        &self.original
    }

    /// Write new contents atomically.
    ///
    /// Returns `false` without touching the file when the contents are
    /// unchanged.
    pub fn commit(self, contents: &str) -> Result<bool> {
        if contents == self.original {
            tracing::debug!("Unchanged {}", self.path.display());
            return Ok(false);
        }
        write_atomic(&self.path, contents.as_bytes())?;
        tracing::info!("Updated {}", self.path.display());
        Ok(true)
    }
}

/// File store rooted in a project directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct ProjectFileStore {
    project_root: PathBuf,
}

impl ProjectFileStore {
    /// Create a store for a project root.
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }

    fn display<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.project_root)
            .unwrap_or(path)
            .display()
    }
}

impl FileStore for ProjectFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| not_found_or_io(path, e))
    }

    fn create_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(path, contents)?;
        tracing::info!("Created {}", self.display(path));
        Ok(())
    }

    fn update_file(&self, path: &Path) -> Result<MutableFile> {
        let original = self.read(path)?;
        Ok(MutableFile {
            path: path.to_path_buf(),
            original,
        })
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(path)?;
        tracing::info!("Created {}", self.display(path));
        Ok(())
    }
}

/// Write to a temporary sibling, then rename over the target.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("not a file path: {}", path.display()))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    if let Err(e) = fs::write(&temp_path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

fn not_found_or_io(path: &Path, e: std::io::Error) -> SetupError {
    if e.kind() == std::io::ErrorKind::NotFound {
        SetupError::MissingFile {
            path: path.to_path_buf(),
            message: "File not found".to_string(),
        }
    } else {
        SetupError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_file_makes_parents() {
        let temp = TempDir::new().unwrap();
        let store = ProjectFileStore::new(temp.path());
        let path = temp.path().join("a/b/c.txt");

        store.create_file(&path, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn create_file_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = ProjectFileStore::new(temp.path());
        let path = temp.path().join("web.xml");

        store.create_file(&path, b"<web-app/>").unwrap();
        assert!(!temp.path().join("web.xml.tmp").exists());
    }

    #[test]
    fn update_without_commit_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let store = ProjectFileStore::new(temp.path());
        let path = temp.path().join("pom.xml");
        fs::write(&path, "before").unwrap();

        let file = store.update_file(&path).unwrap();
        assert_eq!(file.contents(), "before");
        drop(file);

        assert_eq!(fs::read_to_string(&path).unwrap(), "before");
    }

    #[test]
    fn commit_writes_new_contents() {
        let temp = TempDir::new().unwrap();
        let store = ProjectFileStore::new(temp.path());
        let path = temp.path().join("pom.xml");
        fs::write(&path, "before").unwrap();

        let file = store.update_file(&path).unwrap();
        assert!(file.commit("after").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "after");
    }

    #[test]
    fn commit_of_identical_contents_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let store = ProjectFileStore::new(temp.path());
        let path = temp.path().join("pom.xml");
        fs::write(&path, "same").unwrap();

        let file = store.update_file(&path).unwrap();
        assert!(!file.commit("same").unwrap());
    }

    #[test]
    fn update_missing_file_is_missing_file_error() {
        let temp = TempDir::new().unwrap();
        let store = ProjectFileStore::new(temp.path());
        let err = store.update_file(&temp.path().join("missing.xml")).unwrap_err();
        assert!(matches!(err, SetupError::MissingFile { .. }));
    }

    #[test]
    fn create_directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = ProjectFileStore::new(temp.path());
        let dir = temp.path().join("WEB-INF/decorators");

        store.create_directory(&dir).unwrap();
        store.create_directory(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(store.exists(&dir));
    }
}
