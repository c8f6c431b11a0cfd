//! Storage errors
//!
//! Durable-storage failures are propagated to the caller as-is; the engine
//! never retries or masks them. Disk-full and permission failures get their
//! own variants so callers can word the two differently.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Referenced folder does not exist
    #[error("folder not found: '{id}'")]
    FolderNotFound { id: String },

    /// SQLite database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Could not create the data directory
    #[error("could not create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Device has no space left for the write
    #[error("no space left while writing '{path}'; free up disk space and retry")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Missing filesystem permission
    #[error("permission denied for '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Wrap a directory-creation failure, classifying the interesting kinds
    pub fn create_dir(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied { path, source }
        } else if out_of_space(&source) {
            StorageError::DiskFull { path, source }
        } else {
            StorageError::CreateDirectory { path, source }
        }
    }

    /// Whether this error refers to a missing folder
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::FolderNotFound { .. })
    }
}

// ENOSPC surfaces with different wording per platform; sniff the message.
fn out_of_space(source: &io::Error) -> bool {
    let text = source.to_string().to_lowercase();
    ["no space left", "disk full", "quota exceeded", "not enough space"]
        .iter()
        .any(|needle| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dir_classifies_permission() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::create_dir(Path::new("/data"), source);
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.to_string().contains("/data"));
    }

    #[test]
    fn test_create_dir_classifies_disk_full() {
        let source = io::Error::other("No space left on device (os error 28)");
        let err = StorageError::create_dir(Path::new("/data"), source);
        assert!(matches!(err, StorageError::DiskFull { .. }));
    }

    #[test]
    fn test_create_dir_fallback() {
        let source = io::Error::other("read-only file system");
        let err = StorageError::create_dir(Path::new("/data"), source);
        assert!(matches!(err, StorageError::CreateDirectory { .. }));
    }

    #[test]
    fn test_folder_not_found() {
        let err = StorageError::FolderNotFound {
            id: "f-missing".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("f-missing"));
    }
}
