//! Password file location.
//!
//! Resolution order:
//!
//! 1. Absolute custom file, used verbatim
//! 2. Relative custom file, under `{vhost}/conf/`
//! 3. `{vhost}/conf/{app}/publish.password` if it exists
//! 4. `{vhost}/conf/publish.password`

use std::path::{Path, PathBuf};

use crate::auth::config::AppContext;

use super::traits::CredentialSource;

pub const PASSWORD_FILE_NAME: &str = "publish.password";
pub const CONF_DIR: &str = "conf";

/// Resolve the credential file for an application.
///
/// Only the existence check of the per-application file touches `source`.
pub fn resolve_password_file_path(
    app: &AppContext,
    custom_password_file: Option<&str>,
    source: &dyn CredentialSource,
) -> PathBuf {
    let conf = app.vhost_home.join(CONF_DIR);

    if let Some(custom) = custom_password_file.filter(|c| !c.is_empty()) {
        let custom_path = Path::new(custom);
        if custom_path.is_absolute() {
            return custom_path.to_path_buf();
        }
        return conf.join(custom_path);
    }

    let app_file = conf.join(&app.app_name).join(PASSWORD_FILE_NAME);
    if source.exists(&app_file) {
        return app_file;
    }

    conf.join(PASSWORD_FILE_NAME)
}
