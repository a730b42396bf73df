//! Attachment store collaborator.
//!
//! Files are copied into a managed directory and referenced by an opaque
//! name; the engine only ever checks presence, never content.

use crate::errors::{AppError, AppResult};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

pub struct AttachmentStore {
    dir: PathBuf,
}

impl AttachmentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Copy `source` into the store, returning the opaque reference.
    pub fn store(&self, source: &Path) -> AppResult<String> {
        if !source.is_file() {
            return Err(AppError::Validation(format!(
                "attachment {} does not exist",
                source.display()
            )));
        }

        fs::create_dir_all(&self.dir)?;

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment");
        let reference = format!("{}_{}", Utc::now().format("%Y%m%dT%H%M%S%f"), file_name);
        fs::copy(source, self.dir.join(&reference))?;

        Ok(reference)
    }

    pub fn exists(&self, reference: &str) -> bool {
        self.dir.join(reference).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn store_copies_and_reports_presence() {
        let dir = std::env::temp_dir().join("timebank_attach_test");
        let _ = fs::remove_dir_all(&dir);

        let src = std::env::temp_dir().join("timebank_attach_src.txt");
        let mut f = fs::File::create(&src).expect("create source");
        f.write_all(b"certificate").expect("write");

        let store = AttachmentStore::new(&dir);
        let reference = store.store(&src).expect("store");
        assert!(store.exists(&reference));
        assert!(!store.exists("missing-ref"));
    }

    #[test]
    fn missing_source_is_a_validation_error() {
        let store = AttachmentStore::new(std::env::temp_dir().join("timebank_attach_none"));
        let err = store
            .store(Path::new("/nonexistent/file.pdf"))
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }
}
