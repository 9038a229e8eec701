//! Configuration resolution for the RTMP playback authenticator.
//!
//! Every value follows a three-tier priority system:
//!
//! 1. **Parameter** - Explicitly provided value (highest priority)
//! 2. **Environment Variable** - Value from environment variable
//! 3. **Default** - Built-in default value (lowest priority)
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RTMP_AUTH_REQUIRE_AUTH` | true | Reject connections without valid credentials |
//! | `RTMP_AUTH_TIMEOUT_MS` | 30000ms | Authentication timeout (advisory) |
//! | `RTMP_AUTH_USE_PUBLISH_AUTH` | true | Reserved, not consulted by the decision |
//! | `RTMP_AUTH_OVERRIDE_SECURITY_TOKEN` | true | Mark SecurityToken as satisfied on success |
//! | `RTMP_AUTH_PASSWORD_FILE` | unset | Custom password file (absolute or relative to `conf/`) |
//! | `RTMP_AUTH_VHOST_HOME` | `.` | VHost home directory |
//! | `RTMP_AUTH_APPS` | `live` | Comma-separated applications started at boot |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{Span, info};

/// Default for the require-auth switch
pub const DEFAULT_REQUIRE_AUTH: bool = true;

/// Default authentication timeout in milliseconds
pub const DEFAULT_AUTH_TIMEOUT_MS: u64 = 30_000;

/// Default for the publish-auth flag
pub const DEFAULT_USE_PUBLISH_AUTH: bool = true;

/// Default for the SecurityToken override flag
pub const DEFAULT_OVERRIDE_SECURITY_TOKEN: bool = true;

/// Default vhost home directory
pub const DEFAULT_VHOST_HOME: &str = ".";

/// Default application started by the binaries
pub const DEFAULT_APP_NAME: &str = "live";

pub const REQUIRE_AUTH_ENV_VAR: &str = "RTMP_AUTH_REQUIRE_AUTH";
pub const AUTH_TIMEOUT_ENV_VAR: &str = "RTMP_AUTH_TIMEOUT_MS";
pub const USE_PUBLISH_AUTH_ENV_VAR: &str = "RTMP_AUTH_USE_PUBLISH_AUTH";
pub const OVERRIDE_SECURITY_TOKEN_ENV_VAR: &str = "RTMP_AUTH_OVERRIDE_SECURITY_TOKEN";
pub const PASSWORD_FILE_ENV_VAR: &str = "RTMP_AUTH_PASSWORD_FILE";
pub const VHOST_HOME_ENV_VAR: &str = "RTMP_AUTH_VHOST_HOME";
pub const APPS_ENV_VAR: &str = "RTMP_AUTH_APPS";

fn env_bool(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|value| value.eq_ignore_ascii_case("true") || value == "1")
}

fn resolve_bool(param: Option<bool>, key: &str, default: bool) -> bool {
    param.or_else(|| env_bool(key)).unwrap_or(default)
}

/// Resolve the require-auth switch with priority: parameter -> env var -> default
pub fn resolve_require_auth(param: Option<bool>) -> bool {
    resolve_bool(param, REQUIRE_AUTH_ENV_VAR, DEFAULT_REQUIRE_AUTH)
}

/// Resolve the publish-auth flag with priority: parameter -> env var -> default
pub fn resolve_use_publish_auth(param: Option<bool>) -> bool {
    resolve_bool(param, USE_PUBLISH_AUTH_ENV_VAR, DEFAULT_USE_PUBLISH_AUTH)
}

/// Resolve the SecurityToken override flag with priority: parameter -> env var -> default
pub fn resolve_override_security_token(param: Option<bool>) -> bool {
    resolve_bool(
        param,
        OVERRIDE_SECURITY_TOKEN_ENV_VAR,
        DEFAULT_OVERRIDE_SECURITY_TOKEN,
    )
}

/// Resolve the authentication timeout with priority: parameter -> env var -> default
pub fn resolve_auth_timeout(timeout_ms_param: Option<u64>) -> Duration {
    // Priority 1: Use parameter if provided
    if let Some(timeout_ms) = timeout_ms_param {
        return Duration::from_millis(timeout_ms);
    }

    // Priority 2: Use environment variable if set
    if let Ok(env_timeout) = env::var(AUTH_TIMEOUT_ENV_VAR)
        && let Ok(timeout_ms) = env_timeout.parse::<u64>()
    {
        return Duration::from_millis(timeout_ms);
    }

    // Priority 3: Default value
    Duration::from_millis(DEFAULT_AUTH_TIMEOUT_MS)
}

/// Resolve the custom password file. An empty value counts as unset.
pub fn resolve_custom_password_file(param: Option<String>) -> Option<String> {
    param
        .or_else(|| env::var(PASSWORD_FILE_ENV_VAR).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolve the vhost home directory with priority: parameter -> env var -> default
pub fn resolve_vhost_home(param: Option<PathBuf>) -> PathBuf {
    param
        .or_else(|| {
            env::var(VHOST_HOME_ENV_VAR)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_VHOST_HOME))
}

/// Resolve the applications to start. Blank entries are dropped.
pub fn resolve_app_names(param: Option<Vec<String>>) -> Vec<String> {
    let raw = param.unwrap_or_else(|| {
        env::var(APPS_ENV_VAR)
            .map(|value| value.split(',').map(str::to_string).collect())
            .unwrap_or_default()
    });

    let names: Vec<String> = raw
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        vec![DEFAULT_APP_NAME.to_string()]
    } else {
        names
    }
}

/// Typed authentication policy for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPolicy {
    /// When false every connection is accepted without looking at credentials
    pub require_auth: bool,
    /// Accepted for compatibility; nothing enforces it.
    pub auth_timeout: Duration,
    /// Accepted for compatibility; not consulted by the decision.
    pub use_publish_auth: bool,
    /// Signal that token-based authentication is already satisfied on success
    pub override_security_token: bool,
    pub custom_password_file: Option<String>,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            require_auth: DEFAULT_REQUIRE_AUTH,
            auth_timeout: Duration::from_millis(DEFAULT_AUTH_TIMEOUT_MS),
            use_publish_auth: DEFAULT_USE_PUBLISH_AUTH,
            override_security_token: DEFAULT_OVERRIDE_SECURITY_TOKEN,
            custom_password_file: None,
        }
    }
}

impl AuthPolicy {
    /// Build a policy from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            require_auth: resolve_require_auth(None),
            auth_timeout: resolve_auth_timeout(None),
            use_publish_auth: resolve_use_publish_auth(None),
            override_security_token: resolve_override_security_token(None),
            custom_password_file: resolve_custom_password_file(None),
        }
    }

    pub fn with_require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = require_auth;
        self
    }

    pub fn with_override_security_token(mut self, override_security_token: bool) -> Self {
        self.override_security_token = override_security_token;
        self
    }

    pub fn with_custom_password_file(mut self, path: impl Into<String>) -> Self {
        self.custom_password_file = Some(path.into()).filter(|p: &String| !p.trim().is_empty());
        self
    }

    pub(crate) fn log_summary(&self, span: &Span) {
        info!(parent: span, "Configuration loaded:");
        info!(parent: span, "  Require Auth: {}", self.require_auth);
        info!(parent: span, "  Auth Timeout: {}ms", self.auth_timeout.as_millis());
        info!(parent: span, "  Use Publish Auth: {}", self.use_publish_auth);
        info!(parent: span, "  Override SecurityToken: {}", self.override_security_token);
        if let Some(ref custom) = self.custom_password_file {
            info!(parent: span, "  Custom Password File: {}", custom);
        }
    }
}

/// Location of an application inside its virtual host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    pub vhost_home: PathBuf,
    pub app_name: String,
}

impl AppContext {
    pub fn new(vhost_home: impl Into<PathBuf>, app_name: impl Into<String>) -> Self {
        Self {
            vhost_home: vhost_home.into(),
            app_name: app_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    // SAFETY: Tests are serialized via ENV_TEST_MUTEX to prevent data races
    static ENV_TEST_MUTEX: once_cell::sync::Lazy<StdMutex<()>> =
        once_cell::sync::Lazy::new(|| StdMutex::new(()));

    /// SAFETY: Must be called while holding ENV_TEST_MUTEX to prevent data races.
    unsafe fn set_env(key: &str, value: &str) {
        // SAFETY: Caller ensures ENV_TEST_MUTEX is held
        unsafe { env::set_var(key, value) };
    }

    /// SAFETY: Must be called while holding ENV_TEST_MUTEX to prevent data races.
    unsafe fn remove_env(key: &str) {
        // SAFETY: Caller ensures ENV_TEST_MUTEX is held
        unsafe { env::remove_var(key) };
    }

    mod require_auth {
        use super::*;

        #[test]
        fn test_uses_param_when_provided() {
            assert!(!resolve_require_auth(Some(false)));
        }

        #[test]
        fn test_param_takes_priority_over_env() {
            let _guard = ENV_TEST_MUTEX.lock().unwrap();
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { set_env(REQUIRE_AUTH_ENV_VAR, "false") };
            let result = resolve_require_auth(Some(true));
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { remove_env(REQUIRE_AUTH_ENV_VAR) };
            assert!(result);
        }

        #[test]
        fn test_env_accepts_one_and_mixed_case() {
            let _guard = ENV_TEST_MUTEX.lock().unwrap();
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { set_env(OVERRIDE_SECURITY_TOKEN_ENV_VAR, "TRUE") };
            let upper = resolve_override_security_token(None);
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { set_env(OVERRIDE_SECURITY_TOKEN_ENV_VAR, "1") };
            let one = resolve_override_security_token(None);
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { set_env(OVERRIDE_SECURITY_TOKEN_ENV_VAR, "yes") };
            let other = resolve_override_security_token(None);
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { remove_env(OVERRIDE_SECURITY_TOKEN_ENV_VAR) };
            assert!(upper);
            assert!(one);
            assert!(!other);
        }

        #[test]
        fn test_uses_default_when_unset() {
            let _guard = ENV_TEST_MUTEX.lock().unwrap();
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { remove_env(REQUIRE_AUTH_ENV_VAR) };
            assert_eq!(resolve_require_auth(None), DEFAULT_REQUIRE_AUTH);
        }
    }

    mod auth_timeout {
        use super::*;

        #[test]
        fn test_uses_env_var_when_no_param() {
            let _guard = ENV_TEST_MUTEX.lock().unwrap();
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { set_env(AUTH_TIMEOUT_ENV_VAR, "5000") };
            let result = resolve_auth_timeout(None);
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { remove_env(AUTH_TIMEOUT_ENV_VAR) };
            assert_eq!(result, Duration::from_millis(5000));
        }

        #[test]
        fn test_ignores_invalid_env_var() {
            let _guard = ENV_TEST_MUTEX.lock().unwrap();
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { set_env(AUTH_TIMEOUT_ENV_VAR, "-10") };
            let result = resolve_auth_timeout(None);
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { remove_env(AUTH_TIMEOUT_ENV_VAR) };
            assert_eq!(result, Duration::from_millis(DEFAULT_AUTH_TIMEOUT_MS));
        }
    }

    mod password_file {
        use super::*;

        #[test]
        fn test_empty_param_counts_as_unset() {
            let _guard = ENV_TEST_MUTEX.lock().unwrap();
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { remove_env(PASSWORD_FILE_ENV_VAR) };
            assert_eq!(resolve_custom_password_file(Some("  ".to_string())), None);
        }

        #[test]
        fn test_env_var_used_when_no_param() {
            let _guard = ENV_TEST_MUTEX.lock().unwrap();
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { set_env(PASSWORD_FILE_ENV_VAR, "/etc/custom.pwd") };
            let result = resolve_custom_password_file(None);
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { remove_env(PASSWORD_FILE_ENV_VAR) };
            assert_eq!(result.as_deref(), Some("/etc/custom.pwd"));
        }
    }

    mod app_names {
        use super::*;

        #[test]
        fn test_splits_and_trims_env_list() {
            let _guard = ENV_TEST_MUTEX.lock().unwrap();
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { set_env(APPS_ENV_VAR, " live, vod ,,") };
            let result = resolve_app_names(None);
            // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
            unsafe { remove_env(APPS_ENV_VAR) };
            assert_eq!(result, vec!["live".to_string(), "vod".to_string()]);
        }

        #[test]
        fn test_falls_back_to_default_app() {
            assert_eq!(
                resolve_app_names(Some(vec![" ".to_string()])),
                vec![DEFAULT_APP_NAME.to_string()]
            );
        }
    }

    mod policy {
        use super::*;

        #[test]
        fn test_default_policy() {
            let policy = AuthPolicy::default();
            assert!(policy.require_auth);
            assert!(policy.use_publish_auth);
            assert!(policy.override_security_token);
            assert_eq!(policy.auth_timeout, Duration::from_millis(30_000));
            assert!(policy.custom_password_file.is_none());
        }

        #[test]
        fn test_builder_ignores_blank_custom_file() {
            let policy = AuthPolicy::default().with_custom_password_file("");
            assert!(policy.custom_password_file.is_none());

            let policy = AuthPolicy::default()
                .with_require_auth(false)
                .with_custom_password_file("users.pwd");
            assert!(!policy.require_auth);
            assert_eq!(policy.custom_password_file.as_deref(), Some("users.pwd"));
        }
    }
}
