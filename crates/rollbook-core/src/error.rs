use std::collections::TryReserveError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("roll number {0} already exists")]
    DuplicateKey(u32),

    #[error("no record with roll number {0}")]
    NotFound(u32),

    #[error("index {index} out of range for store of {len} records")]
    OutOfRange { index: usize, len: usize },

    #[error("I/O failure on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("memory allocation failed")]
    Allocation(#[from] TryReserveError),

    #[error("store has not been saved to or loaded from a file yet")]
    NoLastPath,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A record field outside its permitted bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRecord {
    #[error("roll number {0} outside {min}..={max}", min = crate::record::KEY_MIN, max = crate::record::KEY_MAX)]
    Key(i64),

    #[error("score {0} outside 0..={max}", max = crate::record::SCORE_MAX)]
    Score(i64),
}
