//! Replica identity observations

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Errors raised when building an observation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObservationError {
    #[error("replica identity token is empty")]
    EmptyToken,
}

/// The identity of the replica that served one response.
///
/// Always non-empty; an empty token means the payload format changed or the
/// extraction pattern is wrong, and is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Observation(String);

impl Observation {
    pub fn new(token: impl Into<String>) -> Result<Self, ObservationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ObservationError::EmptyToken);
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Observation {
    type Error = ObservationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Observation> for String {
    fn from(value: Observation) -> Self {
        value.0
    }
}

impl AsRef<str> for Observation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Ord and Hash are derived from the inner String, so they agree with str
impl Borrow<str> for Observation {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_blank_tokens() {
        assert_eq!(Observation::new(""), Err(ObservationError::EmptyToken));
        assert_eq!(Observation::new("  \t"), Err(ObservationError::EmptyToken));
    }

    #[test]
    fn test_keeps_token_verbatim() {
        let obs = Observation::new("http-svc-7d9f8-abcde").unwrap();
        assert_eq!(obs.as_str(), "http-svc-7d9f8-abcde");
        assert_eq!(obs.to_string(), "http-svc-7d9f8-abcde");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let parsed: Result<Observation, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let parsed: Observation = serde_json::from_str("\"http-svc-1\"").unwrap();
        assert_eq!(parsed.as_str(), "http-svc-1");
    }
}
