//! MCP admin tools for operators.
//!
//! - `auth_check`: Run the connect decision against a JSON parameter list
//! - `auth_list_credentials`: Reload if stale and list loaded usernames
//! - `auth_password_file`: Show the resolved password file
//! - `auth_force_reload`: Reparse the password file unconditionally
//! - `auth_user_exists`: Reload if stale and test a username
//! - `auth_stats`: Loaded count, file path and override flag
//! - `auth_list_apps`: Applications with a running authenticator

use std::sync::Arc;

use poem_mcpserver::{Tools, tool::StructuredContent};
use tracing::info;

use super::authenticator::ConnectionAuthenticator;
use super::params::ConnectionAttempt;
use super::registry::AuthRegistry;
use super::types::{
    AppListResponse, AuthDecision, AuthStatsResponse, CredentialListResponse,
    PasswordFileResponse, ReloadResponse, UserExistsResponse,
};

/// MCP tool implementation over an [`AuthRegistry`].
pub struct McpAuthCommands {
    registry: Arc<AuthRegistry>,
}

impl McpAuthCommands {
    pub fn new(registry: Arc<AuthRegistry>) -> Self {
        Self { registry }
    }

    fn app(&self, app: &str) -> Result<Arc<ConnectionAuthenticator>, String> {
        self.registry
            .get(app)
            .ok_or_else(|| format!("No running application named: {}", app))
    }

    fn credential_list(&self, app: &str) -> Result<CredentialListResponse, String> {
        let auth = self.app(app)?;
        let mut usernames: Vec<String> = auth.list_credentials().into_keys().collect();
        usernames.sort();
        Ok(CredentialListResponse {
            app: app.to_string(),
            password_file: auth.current_password_file_path().display().to_string(),
            count: usernames.len(),
            usernames,
        })
    }

    fn password_file(&self, app: &str) -> Result<PasswordFileResponse, String> {
        let auth = self.app(app)?;
        let path = auth.current_password_file_path();
        Ok(PasswordFileResponse {
            app: app.to_string(),
            exists: path.is_file(),
            password_file: path.display().to_string(),
        })
    }

    fn reload(&self, app: &str) -> Result<ReloadResponse, String> {
        let auth = self.app(app)?;
        let reloaded = auth.force_reload();
        info!("Manual credential reload for {}: reloaded={}", app, reloaded);
        Ok(ReloadResponse {
            app: app.to_string(),
            reloaded,
            loaded_users: auth.store().len(),
            password_file: auth.current_password_file_path().display().to_string(),
        })
    }

    fn user_exists(&self, app: &str, username: String) -> Result<UserExistsResponse, String> {
        let auth = self.app(app)?;
        Ok(UserExistsResponse {
            app: app.to_string(),
            exists: auth.user_exists(&username),
            username,
        })
    }

    fn stats(&self, app: &str) -> Result<AuthStatsResponse, String> {
        let auth = self.app(app)?;
        let snapshot = auth.store().snapshot();
        Ok(AuthStatsResponse {
            app: app.to_string(),
            loaded_users: snapshot.len(),
            password_file: auth.current_password_file_path().display().to_string(),
            require_auth: auth.policy().require_auth,
            override_security_token: auth.policy().override_security_token,
            last_modified: snapshot.last_modified().map(|t| t.to_rfc3339()),
            loaded_at: snapshot.loaded_at.map(|t| t.to_rfc3339()),
            summary: auth.stats_summary(),
        })
    }

    fn check(
        &self,
        app: &str,
        remote_address: Option<String>,
        params: &[serde_json::Value],
    ) -> Result<AuthDecision, String> {
        let auth = self.app(app)?;
        let attempt = ConnectionAttempt::from_json(
            remote_address.unwrap_or_else(|| "admin".to_string()),
            params,
        );
        Ok(auth.authenticate(&attempt))
    }

    fn app_list(&self) -> AppListResponse {
        let apps = self.registry.app_names();
        AppListResponse {
            count: apps.len(),
            apps,
        }
    }
}

#[Tools]
impl McpAuthCommands {
    /// Run the RTMP connect decision for an application.
    ///
    /// `params` mirrors the `NetConnection.connect()` argument list: index 0 is
    /// the command object, credentials follow either as an object with
    /// `username`/`password` fields or as two positional strings.
    async fn auth_check(
        &self,
        /// Application name (e.g., "live")
        app: String,
        /// Connect parameters as a JSON array
        params: Vec<serde_json::Value>,
        /// Remote address to report in logs (default: "admin")
        remote_address: Option<String>,
    ) -> Result<StructuredContent<AuthDecision>, String> {
        self.check(&app, remote_address, &params)
            .map(StructuredContent)
    }

    /// List usernames loaded for an application, reloading the password file if it changed.
    async fn auth_list_credentials(
        &self,
        /// Application name
        app: String,
    ) -> Result<StructuredContent<CredentialListResponse>, String> {
        self.credential_list(&app).map(StructuredContent)
    }

    /// Show which password file an application resolves to.
    async fn auth_password_file(
        &self,
        /// Application name
        app: String,
    ) -> Result<StructuredContent<PasswordFileResponse>, String> {
        self.password_file(&app).map(StructuredContent)
    }

    /// Reparse an application's password file regardless of its modification time.
    async fn auth_force_reload(
        &self,
        /// Application name
        app: String,
    ) -> Result<StructuredContent<ReloadResponse>, String> {
        self.reload(&app).map(StructuredContent)
    }

    /// Check whether a username exists in an application's password file.
    async fn auth_user_exists(
        &self,
        /// Application name
        app: String,
        /// Username, matched exactly
        username: String,
    ) -> Result<StructuredContent<UserExistsResponse>, String> {
        self.user_exists(&app, username).map(StructuredContent)
    }

    /// Authentication statistics for an application.
    async fn auth_stats(
        &self,
        /// Application name
        app: String,
    ) -> Result<StructuredContent<AuthStatsResponse>, String> {
        self.stats(&app).map(StructuredContent)
    }

    /// List applications with a running authenticator.
    async fn auth_list_apps(&self) -> StructuredContent<AppListResponse> {
        StructuredContent(self.app_list())
    }
}
