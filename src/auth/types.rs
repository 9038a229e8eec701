//! Serializable decision and admin response types.
//!
//! All types implement `Serialize`, `Deserialize`, and `JsonSchema` so they
//! can be returned from the MCP admin tools unchanged.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Text handed to the host when a connection is rejected.
pub const REJECTION_MESSAGE: &str =
    "RTMP authentication required: use NetConnection.connect() with username and password parameters";

/// Why a connection was accepted or rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Credentials matched
    Ok,
    /// Authentication disabled by policy
    AuthNotRequired,
    /// No recognizable username/password in the connect parameters
    NoCredentialsProvided,
    /// Username or password blank after trimming
    InvalidInput,
    /// Username not present in the password file
    UnknownUser,
    /// Username known, password differs
    PasswordMismatch,
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasonCode::Ok => write!(f, "ok"),
            ReasonCode::AuthNotRequired => write!(f, "auth_not_required"),
            ReasonCode::NoCredentialsProvided => write!(f, "no_credentials_provided"),
            ReasonCode::InvalidInput => write!(f, "invalid_input"),
            ReasonCode::UnknownUser => write!(f, "unknown_user"),
            ReasonCode::PasswordMismatch => write!(f, "password_mismatch"),
        }
    }
}

/// Which connect convention supplied the credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Object,
    Positional,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Object => write!(f, "object"),
            AuthMethod::Positional => write!(f, "positional"),
        }
    }
}

/// Outcome of one connection attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthDecision {
    pub accepted: bool,
    /// Trimmed username, set only on a credential match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub reason: ReasonCode,
    /// Token-based authentication should be treated as already satisfied
    #[serde(default)]
    pub override_competing_auth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AuthMethod>,
}

impl AuthDecision {
    /// Accepted without looking at credentials.
    pub fn bypass() -> Self {
        Self {
            accepted: true,
            username: None,
            reason: ReasonCode::AuthNotRequired,
            override_competing_auth: false,
            method: None,
        }
    }

    pub fn accept(
        username: impl Into<String>,
        method: AuthMethod,
        override_competing_auth: bool,
    ) -> Self {
        Self {
            accepted: true,
            username: Some(username.into()),
            reason: ReasonCode::Ok,
            override_competing_auth,
            method: Some(method),
        }
    }

    pub fn reject(reason: ReasonCode) -> Self {
        Self {
            accepted: false,
            username: None,
            reason,
            override_competing_auth: false,
            method: None,
        }
    }

    /// Message for the host's reject call, `None` when accepted.
    pub fn rejection_message(&self) -> Option<&'static str> {
        (!self.accepted).then_some(REJECTION_MESSAGE)
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CredentialListResponse {
    pub app: String,
    pub password_file: String,
    /// Loaded usernames, sorted. Passwords are never returned.
    pub usernames: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PasswordFileResponse {
    pub app: String,
    pub password_file: String,
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReloadResponse {
    pub app: String,
    /// Whether a new table was published
    pub reloaded: bool,
    pub loaded_users: usize,
    pub password_file: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UserExistsResponse {
    pub app: String,
    pub username: String,
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AuthStatsResponse {
    pub app: String,
    pub loaded_users: usize,
    pub password_file: String,
    pub require_auth: bool,
    pub override_security_token: bool,
    /// Modification time of the loaded file (RFC3339 format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Time of the last successful load (RFC3339 format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
    /// Human-readable one-line summary
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AppListResponse {
    pub apps: Vec<String>,
    pub count: usize,
}
