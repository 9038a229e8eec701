//! Connect-time parameter model.
//!
//! The host hands over an ordered list of opaque values from
//! `NetConnection.connect()`. They are translated once, in
//! [`ConnectParam::from_json`], into a closed set of variants so the rest
//! of the crate never inspects host types.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// One connect parameter as seen by the authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectParam {
    /// Structured object with named fields. A `None` field value is an explicit null.
    Object(BTreeMap<String, Option<String>>),
    /// Any non-object value, already stringified
    Scalar(String),
    Null,
}

impl ConnectParam {
    /// Translate a host value into the parameter model.
    ///
    /// Objects keep their top-level fields; nested values are stringified as JSON.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ConnectParam::Null,
            Value::String(text) => ConnectParam::Scalar(text.clone()),
            Value::Object(map) => ConnectParam::Object(
                map.iter()
                    .map(|(key, field)| (key.clone(), json_field_text(field)))
                    .collect(),
            ),
            other => ConnectParam::Scalar(other.to_string()),
        }
    }

    pub fn scalar(text: impl Into<String>) -> Self {
        ConnectParam::Scalar(text.into())
    }

    pub fn object<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ConnectParam::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        )
    }

    pub fn is_object(&self) -> bool {
        matches!(self, ConnectParam::Object(_))
    }

    pub fn has_field(&self, name: &str) -> bool {
        match self {
            ConnectParam::Object(fields) => fields.contains_key(name),
            _ => false,
        }
    }

    /// Text of a named field. `None` when the field is missing or null.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            ConnectParam::Object(fields) => fields.get(name).and_then(|v| v.as_deref()),
            _ => None,
        }
    }
}

fn json_field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

impl fmt::Display for ConnectParam {
    /// Objects render their field names only, so values never reach logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectParam::Scalar(text) => f.write_str(text),
            ConnectParam::Null => Ok(()),
            ConnectParam::Object(fields) => {
                let names: Vec<&str> = fields.keys().map(String::as_str).collect();
                write!(f, "{{{}}}", names.join(", "))
            }
        }
    }
}

/// A single connection attempt. Not retained after the decision.
#[derive(Debug, Clone)]
pub struct ConnectionAttempt {
    pub remote_address: String,
    pub params: Vec<ConnectParam>,
}

impl ConnectionAttempt {
    pub fn new(remote_address: impl Into<String>, params: Vec<ConnectParam>) -> Self {
        Self {
            remote_address: remote_address.into(),
            params,
        }
    }

    pub fn from_json(remote_address: impl Into<String>, params: &[Value]) -> Self {
        Self::new(
            remote_address,
            params.iter().map(ConnectParam::from_json).collect(),
        )
    }
}
