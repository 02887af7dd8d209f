//! Flat scanning of one resource-type directory
//!
//! Each regular file directly inside the directory is one resource. The
//! resource name is the file basename without its extension.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::Format;
use crate::error::{Result, SyncError};

/// A resource file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalResourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name including extension, sent as the multipart filename
    pub file_name: String,
    /// Resource name derived from the basename
    pub name: String,
    /// Format detected from the extension
    pub format: Format,
}

impl LocalResourceFile {
    /// Describe a path as a resource file
    ///
    /// Returns `None` for hidden files and unsupported extensions.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_string();
        if file_name.starts_with('.') {
            return None;
        }
        let format = Format::from_path(path)?;
        let name = path.file_stem()?.to_str()?.to_string();

        Some(Self {
            path: path.to_path_buf(),
            file_name,
            name,
            format,
        })
    }
}

/// Result of scanning a type directory
#[derive(Debug, Clone, Default)]
pub struct LocalScan {
    /// Resource files in file-name order
    pub files: Vec<LocalResourceFile>,
    /// Regular files that are not resource files
    pub ignored: Vec<PathBuf>,
}

impl LocalScan {
    /// Whether a local file exists for the given resource name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }
}

/// Scan a type directory for resource files
///
/// A missing directory yields an empty scan.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read.
pub fn scan_directory(dir: &Path) -> Result<LocalScan> {
    let mut scan = LocalScan::default();
    if !dir.exists() {
        return Ok(scan);
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| SyncError::Io {
            resource: dir_label(dir),
            path: e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        match LocalResourceFile::from_path(entry.path()) {
            Some(file) => scan.files.push(file),
            None => scan.ignored.push(entry.into_path()),
        }
    }

    Ok(scan)
}

fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<resources>")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let scan = scan_directory(&tmp.path().join("Applications")).unwrap();
        assert!(scan.files.is_empty());
        assert!(scan.ignored.is_empty());
    }

    #[test]
    fn test_scan_is_flat_and_sorted() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("Applications");
        fs::create_dir(&dir).unwrap();

        fs::write(dir.join("Zeta.yml"), "applicationName: Zeta").unwrap();
        fs::write(dir.join("Alpha.json"), "{}").unwrap();
        fs::write(dir.join("notes.txt"), "ignore").unwrap();
        fs::write(dir.join(".hidden.yml"), "ignore").unwrap();

        // Nested files are not resources
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("Inner.yml"), "x").unwrap();

        let scan = scan_directory(&dir).unwrap();

        let names: Vec<_> = scan.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert_eq!(scan.files[0].format, Format::Json);
        assert_eq!(scan.files[1].file_name, "Zeta.yml");
        assert_eq!(scan.ignored.len(), 2);
        assert!(scan.contains("Zeta"));
        assert!(!scan.contains("Inner"));
    }

    #[test]
    fn test_name_keeps_inner_dots() {
        let file = LocalResourceFile::from_path(Path::new("/tmp/My.App.yaml")).unwrap();
        assert_eq!(file.name, "My.App");
        assert_eq!(file.file_name, "My.App.yaml");
    }
}
