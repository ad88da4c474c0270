//! Replica identity extraction
//!
//! The replica is recognised by matching a regular expression against the
//! free-text response body. This only works while the echo service keeps
//! printing its hostname; a payload format change turns every response into a
//! malformed one rather than a wrong count, which is the safer failure.

use crate::errors::HttpError;
use lbprobe_config::IdentityConfig;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct IdentityExtractor {
    pattern: Regex,
}

impl IdentityExtractor {
    /// Match `prefix` followed by the rest of its line, e.g. `http-svc.*`
    pub fn from_prefix(prefix: &str) -> Result<Self, HttpError> {
        if prefix.trim().is_empty() {
            return Err(HttpError::ConfigError(
                "identity prefix cannot be empty".to_string(),
            ));
        }
        Self::new(&format!("{}.*", regex::escape(prefix)))
    }

    /// Use a full pattern. If it has a capture group, the first group is the
    /// identity; otherwise the whole match is.
    pub fn new(pattern: &str) -> Result<Self, HttpError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn from_config(config: &IdentityConfig) -> Result<Self, HttpError> {
        match config.pattern {
            Some(ref pattern) => Self::new(pattern),
            None => Self::from_prefix(&config.prefix),
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// First identity token in `body`, trimmed. `None` when nothing matches
    /// or the match is blank.
    pub fn extract(&self, body: &str) -> Option<String> {
        let captures = self.pattern.captures(body)?;
        let token = captures.get(1).or_else(|| captures.get(0))?.as_str().trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}
