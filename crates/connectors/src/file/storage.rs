//! Local storage for uploaded source files and generated exports.

use crate::file::csv::error::FileError;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FileStore {
    upload_dir: PathBuf,
    export_dir: PathBuf,
}

impl FileStore {
    pub fn new(upload_dir: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        FileStore {
            upload_dir: upload_dir.into(),
            export_dir: export_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Copies `source` into the upload directory under a generated name
    /// (`<unix-millis>-<uuid>.<ext>`) and returns the stored path.
    pub fn store_upload(&self, source: &Path) -> Result<PathBuf, FileError> {
        if !source.is_file() {
            return Err(FileError::NotFound(source.display().to_string()));
        }
        std::fs::create_dir_all(&self.upload_dir)?;

        let mut name = format!("{}-{}", unix_millis(), Uuid::new_v4());
        if let Some(ext) = source.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(ext);
        }

        let target = self.upload_dir.join(name);
        std::fs::copy(source, &target)
            .map_err(|e| FileError::from_io(&source.display().to_string(), e))?;

        info!(source = %source.display(), stored = %target.display(), "Stored upload");
        Ok(target)
    }

    /// A fresh `export_<unix-millis>.csv` path inside the export directory.
    pub fn export_path(&self) -> Result<PathBuf, FileError> {
        std::fs::create_dir_all(&self.export_dir)?;

        let millis = unix_millis();
        let path = self.export_dir.join(format!("export_{millis}.csv"));
        if !path.exists() {
            return Ok(path);
        }

        // Same millisecond as an earlier export
        let suffix = Uuid::new_v4().simple().to_string();
        Ok(self
            .export_dir
            .join(format!("export_{millis}_{}.csv", &suffix[..8])))
    }
}

fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_upload_generates_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("people.csv");
        std::fs::write(&source, "a,b\n1,2\n").unwrap();

        let store = FileStore::new(dir.path().join("uploads"), dir.path().join("exports"));
        let first = store.store_upload(&source).unwrap();
        let second = store.store_upload(&source).unwrap();

        assert_ne!(first, second);
        assert_eq!(first.extension().unwrap(), "csv");
        assert!(first.starts_with(store.upload_dir()));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_store_upload_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("u"), dir.path().join("e"));
        assert!(matches!(
            store.store_upload(&dir.path().join("nope.csv")),
            Err(FileError::NotFound(_))
        ));
    }

    #[test]
    fn test_export_path_naming() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("u"), dir.path().join("e"));
        let path = store.export_path().unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("export_"));
        assert!(name.ends_with(".csv"));
        assert!(store.export_dir().is_dir());
    }
}
