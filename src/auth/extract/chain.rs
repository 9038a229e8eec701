//! Extraction chain for trying multiple strategies.

use tracing::debug;

use crate::auth::params::ConnectParam;

use super::traits::{CredentialExtractor, ExtractedCredentials};
use super::{ObjectFormExtractor, PositionalFormExtractor};

/// Extraction chain that tries multiple strategies in order.
///
/// Strategies are tried in the order they were added. The first strategy that
/// recognizes a credential pair stops the chain.
///
/// # Example
///
/// ```ignore
/// let chain = ExtractorChain::new()
///     .with_object_form()
///     .with_positional_form();
///
/// let credentials = chain.extract(&attempt.params);
/// ```
pub struct ExtractorChain {
    extractors: Vec<Box<dyn CredentialExtractor>>,
}

impl ExtractorChain {
    /// Create a new empty extraction chain.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Object form first, then positional.
    pub fn standard() -> Self {
        Self::new().with_object_form().with_positional_form()
    }

    /// Add object-form extraction to the chain.
    pub fn with_object_form(mut self) -> Self {
        self.extractors.push(Box::new(ObjectFormExtractor::new()));
        self
    }

    /// Add positional extraction to the chain.
    pub fn with_positional_form(mut self) -> Self {
        self.extractors.push(Box::new(PositionalFormExtractor::new()));
        self
    }

    /// Check if the chain has any extraction strategies.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Get the number of strategies in the chain.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.extractors.len()
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl CredentialExtractor for ExtractorChain {
    fn extract(&self, params: &[ConnectParam]) -> Option<ExtractedCredentials> {
        for extractor in &self.extractors {
            debug!("Trying credential extraction strategy: {}", extractor.name());

            if let Some(credentials) = extractor.extract(params) {
                debug!(
                    "Credentials extracted with strategy: {}",
                    extractor.name()
                );
                return Some(credentials);
            }
        }
        None
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}
