//! Storage trait for the credential file backend.
//!
//! The store reaches the filesystem only through this trait, so tests can
//! inject an in-memory source and count I/O calls.

use std::io;
use std::path::Path;

/// Read-only access to credential files.
///
/// Implementations must be thread-safe (`Send + Sync`); one source is shared
/// by every connection attempt of an application.
pub trait CredentialSource: Send + Sync {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Last-modified time in milliseconds since the Unix epoch.
    fn modified_millis(&self, path: &Path) -> io::Result<i64>;

    /// Read the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}
