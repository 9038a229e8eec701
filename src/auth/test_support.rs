//! Shared test helpers: a throwaway vhost directory and an in-memory source.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::store::{CONF_DIR, CredentialSource, PASSWORD_FILE_NAME};

/// Temporary vhost home, removed on drop.
pub struct TempVhost {
    root: PathBuf,
}

impl TempVhost {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("rtmp-auth-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(root.join(CONF_DIR)).unwrap();
        Self { root }
    }

    pub fn home(&self) -> &Path {
        &self.root
    }

    pub fn conf_dir(&self) -> PathBuf {
        self.root.join(CONF_DIR)
    }

    /// Write `{vhost}/conf/publish.password`.
    pub fn write_vhost_file(&self, contents: &str) -> PathBuf {
        let path = self.conf_dir().join(PASSWORD_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write `{vhost}/conf/{app}/publish.password`.
    pub fn write_app_file(&self, app: &str, contents: &str) -> PathBuf {
        let dir = self.conf_dir().join(app);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(PASSWORD_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for TempVhost {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// In-memory credential source that counts reads.
#[derive(Default)]
pub struct MemorySource {
    files: Mutex<HashMap<PathBuf, (String, i64)>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: impl Into<PathBuf>, contents: &str, modified: i64) {
        self.files
            .lock()
            .insert(path.into(), (contents.to_string(), modified));
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().remove(path.as_ref());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of full file reads so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl CredentialSource for MemorySource {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    fn modified_millis(&self, path: &Path) -> io::Result<i64> {
        self.files
            .lock()
            .get(path)
            .map(|(_, modified)| *modified)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .get(path)
            .map(|(contents, _)| contents.clone())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}
