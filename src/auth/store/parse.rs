//! `publish.password` parser.
//!
//! One entry per line, `username:password` or `username password`. Blank
//! lines and `#` comments are skipped. The first delimiter wins, and a colon
//! anywhere in the line selects colon splitting.

use std::collections::HashMap;
use std::path::Path;

use crate::auth::error::MalformedLine;

/// username -> password
pub type CredentialTable = HashMap<String, String>;

/// Result of one parse pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedCredentials {
    pub table: CredentialTable,
    pub malformed: Vec<MalformedLine>,
}

/// Parse the file contents. Bad lines are reported, never fatal.
pub fn parse_credentials(contents: &str, path: &Path) -> ParsedCredentials {
    let mut parsed = ParsedCredentials::default();

    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match split_entry(line) {
            Some((username, password)) => {
                // Later lines win
                parsed
                    .table
                    .insert(username.to_string(), password.to_string());
            }
            None => parsed.malformed.push(MalformedLine {
                line: index + 1,
                path: path.to_path_buf(),
            }),
        }
    }

    parsed
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (username, password) = if line.contains(':') {
        line.split_once(':')?
    } else {
        line.split_once(char::is_whitespace)?
    };

    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some((username, password))
}
