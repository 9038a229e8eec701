//! RTMP playback authentication against a `publish.password` file.
//!
//! This module is organized into the following submodules:
//!
//! - `config`: Policy and application context with environment variable support
//! - `error`: Credential file errors
//! - `params`: Connect parameter model and the host adapter
//! - `store`: Hot-reloadable credential store
//! - `extract`: Credential extraction strategies
//! - `authenticator`: Accept/reject decision and admin operations
//! - `registry`: Per-application authenticator lifecycle
//! - `types`: Serializable decision and response types
//! - `commands`: MCP admin tool implementations

pub mod authenticator;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod params;
pub mod registry;
pub mod store;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;

pub use authenticator::ConnectionAuthenticator;
pub use commands::McpAuthCommands;
pub use config::{AppContext, AuthPolicy};
pub use params::{ConnectParam, ConnectionAttempt};
pub use registry::AuthRegistry;
pub use store::{CredentialStore, StoreContext};
pub use types::{AuthDecision, ReasonCode};
