//! Positional extraction: `connect(url, username, password)`.

use crate::auth::params::ConnectParam;
use crate::auth::types::AuthMethod;

use super::traits::{CredentialExtractor, ExtractedCredentials};

/// Positional extraction strategy.
///
/// Needs at least three parameters; index 1 is the username and index 2 the
/// password, and both must stringify to something non-empty.
pub struct PositionalFormExtractor;

impl PositionalFormExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PositionalFormExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialExtractor for PositionalFormExtractor {
    fn extract(&self, params: &[ConnectParam]) -> Option<ExtractedCredentials> {
        if params.len() < 3 {
            return None;
        }

        let username = params[1].to_string();
        let password = params[2].to_string();
        if username.is_empty() || password.is_empty() {
            return None;
        }

        Some(ExtractedCredentials {
            username: Some(username),
            password: Some(password),
            method: AuthMethod::Positional,
        })
    }

    fn name(&self) -> &'static str {
        "positional"
    }
}
