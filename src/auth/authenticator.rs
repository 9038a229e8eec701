//! Connect-time authentication decision.
//!
//! [`ConnectionAuthenticator::decide`] is stateless per attempt: it extracts
//! credentials, refreshes the store if the password file changed and
//! compares. Recording the authenticated state on the client is the host's job.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{Span, info, warn};

use super::config::{AppContext, AuthPolicy};
use super::extract::{CredentialExtractor, ExtractedCredentials, ExtractorChain};
use super::params::ConnectionAttempt;
use super::store::{CredentialStore, CredentialTable, StoreContext};
use super::types::{AuthDecision, ReasonCode};

/// Accept/reject logic for one application.
pub struct ConnectionAuthenticator {
    store: Arc<CredentialStore>,
    policy: AuthPolicy,
    extractors: ExtractorChain,
    span: Span,
}

impl ConnectionAuthenticator {
    pub fn new(store: Arc<CredentialStore>, policy: AuthPolicy) -> Self {
        let span = store.span().clone();
        Self {
            store,
            policy,
            extractors: ExtractorChain::standard(),
            span,
        }
    }

    /// Build the store for `app`, log the policy and load credentials.
    pub fn start(app: AppContext, policy: AuthPolicy) -> Self {
        let context = StoreContext::new(app, policy.custom_password_file.clone());
        let authenticator = Self::new(Arc::new(CredentialStore::new(context)), policy);
        authenticator.log_start();
        authenticator
    }

    /// Same as [`start`](Self::start) with an existing store.
    pub fn start_with_store(store: Arc<CredentialStore>, policy: AuthPolicy) -> Self {
        let authenticator = Self::new(store, policy);
        authenticator.log_start();
        authenticator
    }

    fn log_start(&self) {
        info!(parent: &self.span, "Starting RTMP playback authentication");
        self.policy.log_summary(&self.span);
        self.store.reload_if_stale();
        info!(parent: &self.span, "Module started successfully.");
    }

    /// Forget loaded credentials on application shutdown.
    pub fn stop(&self) {
        self.store.clear();
        info!(parent: &self.span, "Module stopped");
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Decide with the application's own policy.
    pub fn authenticate(&self, attempt: &ConnectionAttempt) -> AuthDecision {
        self.decide(attempt, &self.policy)
    }

    /// Decide whether `attempt` may connect under `policy`.
    pub fn decide(&self, attempt: &ConnectionAttempt, policy: &AuthPolicy) -> AuthDecision {
        if !policy.require_auth {
            return AuthDecision::bypass();
        }

        info!(
            parent: &self.span,
            "Processing RTMP connect request from {}", attempt.remote_address
        );

        let Some(credentials) = self.extractors.extract(&attempt.params) else {
            warn!(
                parent: &self.span,
                "No standard RTMP credentials provided from {}", attempt.remote_address
            );
            return self.rejected(attempt, ReasonCode::NoCredentialsProvided);
        };

        // Every authenticated attempt re-checks the file
        self.store.reload_if_stale();

        let decision = self.verify(&credentials, policy);
        if !decision.accepted {
            return self.rejected(attempt, decision.reason);
        }

        if let Some(ref username) = decision.username {
            info!(
                parent: &self.span,
                "User '{}' authenticated successfully via {} parameters",
                username,
                credentials.method
            );
            if decision.override_competing_auth {
                info!(
                    parent: &self.span,
                    "SecurityToken authentication overridden for user: {}", username
                );
            }
        }
        decision
    }

    fn verify(&self, credentials: &ExtractedCredentials, policy: &AuthPolicy) -> AuthDecision {
        let username = credentials
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let password = credentials
            .password
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        let (Some(username), Some(password)) = (username, password) else {
            return AuthDecision::reject(ReasonCode::InvalidInput);
        };

        match self.store.lookup(username) {
            None => {
                warn!(parent: &self.span, "User '{}' not found in credentials", username);
                AuthDecision::reject(ReasonCode::UnknownUser)
            }
            Some(stored) if stored != password => {
                warn!(parent: &self.span, "Password mismatch for user '{}'", username);
                AuthDecision::reject(ReasonCode::PasswordMismatch)
            }
            Some(_) => AuthDecision::accept(
                username,
                credentials.method,
                policy.override_security_token,
            ),
        }
    }

    fn rejected(&self, attempt: &ConnectionAttempt, reason: ReasonCode) -> AuthDecision {
        warn!(
            parent: &self.span,
            "Rejecting connection from {} ({})", attempt.remote_address, reason
        );
        AuthDecision::reject(reason)
    }

    /// Log the disconnect of an authenticated client.
    pub fn on_disconnect(&self, username: Option<&str>) {
        if let Some(username) = username {
            info!(parent: &self.span, "User '{}' disconnected", username);
        }
    }

    /// Reload if stale, then copy the whole table.
    pub fn list_credentials(&self) -> CredentialTable {
        self.store.reload_if_stale();
        CredentialTable::clone(&self.store.snapshot().table)
    }

    pub fn current_password_file_path(&self) -> PathBuf {
        self.store.password_file_path()
    }

    /// Reparse the password file regardless of its modification time.
    pub fn force_reload(&self) -> bool {
        self.store.force_reload()
    }

    /// Reload if stale, then test membership. The name is matched as given.
    pub fn user_exists(&self, username: &str) -> bool {
        self.store.reload_if_stale();
        self.store.contains(username)
    }

    pub fn stats_summary(&self) -> String {
        format!(
            "Loaded users: {}, Password file: {}, Override SecurityToken: {}",
            self.store.len(),
            self.current_password_file_path().display(),
            self.policy.override_security_token
        )
    }
}
