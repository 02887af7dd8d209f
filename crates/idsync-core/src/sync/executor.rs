//! Writes exported files to the local tree

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// Writes exported content under one type directory
pub struct ExportWriter<'a> {
    dir: &'a Path,
}

impl<'a> ExportWriter<'a> {
    /// Create a writer for `dir`
    #[must_use]
    pub const fn new(dir: &'a Path) -> Self {
        Self { dir }
    }

    /// Write `content` to `dir/file_name`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` attributed to `resource` if the directory
    /// cannot be created or the file cannot be written.
    pub fn write(&self, file_name: &str, content: &str, resource: &str) -> Result<PathBuf> {
        let io_error = |path: &Path, source| SyncError::Io {
            resource: resource.to_string(),
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(self.dir).map_err(|e| io_error(self.dir, e))?;

        let path = self.dir.join(file_name);
        fs::write(&path, content).map_err(|e| io_error(&path, e))?;
        Ok(path)
    }
}
