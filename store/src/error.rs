use std::path::PathBuf;

/// Errors from the keyed store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem I/O error.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Backing file exists but is not a JSON array of records.
    #[error("malformed store {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Records could not be serialized.
    #[error("failed to encode records for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No record carries the requested key.
    #[error("no record with {field} = {key} in {}", .path.display())]
    NotFound {
        field: &'static str,
        key: String,
        path: PathBuf,
    },
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error signals a missing key rather than a broken store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
