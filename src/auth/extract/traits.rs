//! Credential extraction strategy trait definition.
//!
//! Defines the interface for pulling a username/password pair out of
//! connect parameters, enabling the Strategy pattern for the supported
//! `NetConnection.connect()` calling conventions.

use crate::auth::params::ConnectParam;
use crate::auth::types::AuthMethod;

/// A username/password pair as supplied by the client, before any trimming.
///
/// Either half may be `None` when the client sent an explicit null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub method: AuthMethod,
}

/// Trait for credential extraction strategies.
///
/// Implementations must be thread-safe (`Send + Sync`); one chain serves
/// every connection attempt of an application.
pub trait CredentialExtractor: Send + Sync {
    /// Look for credentials in the connect parameters.
    ///
    /// # Returns
    ///
    /// * `Some(credentials)` - This strategy recognized a credential pair
    /// * `None` - Nothing this strategy understands was found
    fn extract(&self, params: &[ConnectParam]) -> Option<ExtractedCredentials>;

    /// Get the name of this extraction strategy.
    ///
    /// Used for logging and debugging purposes.
    fn name(&self) -> &'static str;
}
