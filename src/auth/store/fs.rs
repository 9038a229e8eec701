//! Filesystem-backed credential source.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};

use super::traits::CredentialSource;

/// Reads credential files straight from local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCredentialSource;

impl FsCredentialSource {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialSource for FsCredentialSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn modified_millis(&self, path: &Path) -> io::Result<i64> {
        let modified = fs::metadata(path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified).timestamp_millis())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
