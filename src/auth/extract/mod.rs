//! Credential extraction strategies for `NetConnection.connect()` parameters.
//!
//! # Available Strategies
//!
//! - [`ObjectFormExtractor`]: `{username, password}` object after the command object
//! - [`PositionalFormExtractor`]: username and password as parameters 1 and 2
//!
//! [`ExtractorChain::standard`] tries them in that order.

mod chain;
mod object;
mod positional;
mod traits;

pub use chain::ExtractorChain;
pub use object::{ObjectFormExtractor, PASSWORD_FIELD, USERNAME_FIELD};
pub use positional::PositionalFormExtractor;
pub use traits::{CredentialExtractor, ExtractedCredentials};
