//! Hot-reloadable credential store.
//!
//! The table is published as an immutable [`StoreState`] snapshot behind an
//! `Arc`. A reload builds the next snapshot off to the side and swaps it in
//! under a short write lock, so a lookup sees either the old table or the new
//! one, never a mix.
//!
//! # Thread Safety
//!
//! Lookups clone the current `Arc` and release the lock immediately; no lock
//! is held across file I/O. Reloads are serialized among themselves by a
//! separate mutex and re-check staleness once they hold it.

mod fs;
mod parse;
mod path;
mod traits;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::{Span, debug, error, info, info_span, warn};

use super::config::AppContext;
use super::error::StoreError;

pub use fs::FsCredentialSource;
pub use parse::{CredentialTable, ParsedCredentials, parse_credentials};
pub use path::{CONF_DIR, PASSWORD_FILE_NAME, resolve_password_file_path};
pub use traits::CredentialSource;

/// Explicit construction context: where the application lives, the
/// configured override file and the span all diagnostics are emitted under.
#[derive(Debug, Clone)]
pub struct StoreContext {
    pub app: AppContext,
    pub custom_password_file: Option<String>,
    pub span: Span,
}

impl StoreContext {
    pub fn new(app: AppContext, custom_password_file: Option<String>) -> Self {
        let span = info_span!("rtmp_auth", app = %app.app_name);
        Self {
            app,
            custom_password_file,
            span,
        }
    }
}

/// Whether a store has ever published a non-empty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Empty,
    Loaded,
}

/// One published snapshot of the credential file.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    /// File the table was parsed from
    pub path: Option<PathBuf>,
    /// Modification time of that file in epoch millis. `None` forces the next reload.
    pub modified: Option<i64>,
    pub table: Arc<CredentialTable>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl StoreState {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.modified.and_then(DateTime::from_timestamp_millis)
    }
}

/// Username -> password table backed by a `publish.password` file.
pub struct CredentialStore {
    app: AppContext,
    custom_password_file: RwLock<Option<String>>,
    span: Span,
    source: Arc<dyn CredentialSource>,
    current: RwLock<Arc<StoreState>>,
    reload_lock: Mutex<()>,
}

impl CredentialStore {
    /// Create an empty store reading from local disk.
    pub fn new(context: StoreContext) -> Self {
        Self::with_source(context, Arc::new(FsCredentialSource::new()))
    }

    /// Create an empty store reading through a custom source.
    pub fn with_source(context: StoreContext, source: Arc<dyn CredentialSource>) -> Self {
        Self {
            app: context.app,
            custom_password_file: RwLock::new(context.custom_password_file),
            span: context.span,
            source,
            current: RwLock::new(Arc::new(StoreState::default())),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Change the configured override file. Takes effect on the next reload.
    pub fn set_custom_password_file(&self, custom: Option<String>) {
        *self.custom_password_file.write() = custom.filter(|c| !c.trim().is_empty());
    }

    /// Current password file location, recomputed on every call.
    pub fn password_file_path(&self) -> PathBuf {
        let custom = self.custom_password_file.read().clone();
        resolve_password_file_path(&self.app, custom.as_deref(), self.source.as_ref())
    }

    /// The published snapshot.
    pub fn snapshot(&self) -> Arc<StoreState> {
        self.current.read().clone()
    }

    pub fn state(&self) -> LoadState {
        if self.snapshot().is_empty() {
            LoadState::Empty
        } else {
            LoadState::Loaded
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Stored password for `username`.
    pub fn lookup(&self, username: &str) -> Option<String> {
        self.snapshot().table.get(username).cloned()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.snapshot().table.contains_key(username)
    }

    /// Reparse the password file if it changed since the last load.
    ///
    /// Missing or unreadable files are logged and leave the current table in
    /// place. Returns whether a new table was published.
    pub fn reload_if_stale(&self) -> bool {
        match self.try_reload() {
            Ok(changed) => changed,
            Err(err @ StoreError::FileNotFound { .. }) => {
                warn!(parent: &self.span, "{}", err);
                false
            }
            Err(err) => {
                error!(parent: &self.span, "{}", err);
                false
            }
        }
    }

    /// Drop the staleness timestamp so the next reload always reparses.
    pub fn force_invalidate(&self) {
        let mut current = self.current.write();
        let mut next = StoreState::clone(&current);
        next.modified = None;
        *current = Arc::new(next);
    }

    /// Invalidate and reload immediately.
    pub fn force_reload(&self) -> bool {
        self.force_invalidate();
        self.reload_if_stale()
    }

    /// Forget every loaded entry. The store goes back to [`LoadState::Empty`].
    pub fn clear(&self) {
        *self.current.write() = Arc::new(StoreState::default());
    }

    fn is_fresh(&self, path: &Path, modified: i64) -> bool {
        let current = self.snapshot();
        current.path.as_deref() == Some(path)
            && current.modified == Some(modified)
            && !current.is_empty()
    }

    fn try_reload(&self) -> Result<bool, StoreError> {
        let path = self.password_file_path();
        if !self.source.exists(&path) {
            return Err(StoreError::FileNotFound { path });
        }

        let modified = self
            .source
            .modified_millis(&path)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        if self.is_fresh(&path, modified) {
            debug!(parent: &self.span, "Password file unchanged: {}", path.display());
            return Ok(false);
        }

        let _guard = self.reload_lock.lock();
        // Another attempt may have published while we waited
        if self.is_fresh(&path, modified) {
            return Ok(false);
        }

        let contents = self
            .source
            .read_to_string(&path)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        let parsed = parse_credentials(&contents, &path);
        for malformed in &parsed.malformed {
            warn!(parent: &self.span, "{}", malformed);
        }

        let loaded = parsed.table.len();
        let next = StoreState {
            path: Some(path.clone()),
            modified: Some(modified),
            table: Arc::new(parsed.table),
            loaded_at: Some(Utc::now()),
        };
        *self.current.write() = Arc::new(next);

        info!(
            parent: &self.span,
            "Loaded {} user credentials from {}",
            loaded,
            path.display()
        );
        Ok(true)
    }
}
