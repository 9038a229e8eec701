//! Object-form extraction: `connect(url, {username, password})`.

use crate::auth::params::ConnectParam;
use crate::auth::types::AuthMethod;

use super::traits::{CredentialExtractor, ExtractedCredentials};

pub const USERNAME_FIELD: &str = "username";
pub const PASSWORD_FIELD: &str = "password";

/// Object-form extraction strategy.
///
/// Scans parameters from index 1 and takes the first object exposing both a
/// `username` and a `password` field. Index 0 is the command object.
pub struct ObjectFormExtractor;

impl ObjectFormExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ObjectFormExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialExtractor for ObjectFormExtractor {
    fn extract(&self, params: &[ConnectParam]) -> Option<ExtractedCredentials> {
        params
            .iter()
            .skip(1)
            .find(|param| param.has_field(USERNAME_FIELD) && param.has_field(PASSWORD_FIELD))
            .map(|param| ExtractedCredentials {
                username: param.field(USERNAME_FIELD).map(str::to_string),
                password: param.field(PASSWORD_FIELD).map(str::to_string),
                method: AuthMethod::Object,
            })
    }

    fn name(&self) -> &'static str {
        "object"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn creds(username: &str, password: &str) -> ConnectParam {
        ConnectParam::object([(USERNAME_FIELD, username), (PASSWORD_FIELD, password)])
    }

    #[test]
    fn test_object_at_index_one() {
        let params = vec![ConnectParam::Object(BTreeMap::new()), creds("user1", "pass1")];
        let extracted = ObjectFormExtractor::new().extract(&params).unwrap();
        assert_eq!(extracted.username.as_deref(), Some("user1"));
        assert_eq!(extracted.password.as_deref(), Some("pass1"));
        assert_eq!(extracted.method, AuthMethod::Object);
    }

    #[test]
    fn test_index_zero_is_ignored() {
        let params = vec![creds("user1", "pass1")];
        assert!(ObjectFormExtractor::new().extract(&params).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let params = vec![
            ConnectParam::Null,
            ConnectParam::scalar("noise"),
            ConnectParam::object([(USERNAME_FIELD, "only-user")]),
            creds("first", "one"),
            creds("second", "two"),
        ];
        let extracted = ObjectFormExtractor::new().extract(&params).unwrap();
        assert_eq!(extracted.username.as_deref(), Some("first"));
    }

    #[test]
    fn test_null_fields_still_match() {
        let mut fields = BTreeMap::new();
        fields.insert(USERNAME_FIELD.to_string(), None);
        fields.insert(PASSWORD_FIELD.to_string(), Some("pw".to_string()));
        let params = vec![ConnectParam::Null, ConnectParam::Object(fields)];

        let extracted = ObjectFormExtractor::new().extract(&params).unwrap();
        assert!(extracted.username.is_none());
        assert_eq!(extracted.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_scalars_are_not_objects() {
        let params = vec![
            ConnectParam::Null,
            ConnectParam::scalar("user1"),
            ConnectParam::scalar("pass1"),
        ];
        assert!(ObjectFormExtractor::new().extract(&params).is_none());
    }

    #[test]
    fn test_name() {
        assert_eq!(ObjectFormExtractor::default().name(), "object");
    }
}
