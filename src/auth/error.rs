//! Error types for credential file handling.
//!
//! None of these are fatal. The store logs them and keeps serving its last
//! good table; connection attempts only ever see a [`ReasonCode`].
//!
//! [`ReasonCode`]: crate::auth::types::ReasonCode

use std::io;
use std::path::PathBuf;

/// Failures while refreshing the credential table from disk.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Password file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Error reading password file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn path(&self) -> &PathBuf {
        match self {
            StoreError::FileNotFound { path } | StoreError::Io { path, .. } => path,
        }
    }
}

/// A credential file line that could not be split into a username and password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid line format at line {line} in {}", .path.display())]
pub struct MalformedLine {
    /// 1-based line number
    pub line: usize,
    pub path: PathBuf,
}
