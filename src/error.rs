use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing the preferences file or a content file.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode settings for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            StorageError::Read { path, .. }
            | StorageError::Write { path, .. }
            | StorageError::Parse { path, .. }
            | StorageError::Encode { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum SaveError {
    /// The buffer has never been opened from or saved to a file.
    #[error("no file name set")]
    NoPath,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
