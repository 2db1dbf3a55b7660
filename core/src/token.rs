//! Work token type

use serde::{Deserialize, Serialize};

use crate::error::{Result, StressError};

/// An opaque unit of work (an object key, a branch name, ...)
///
/// The generator never looks inside a token. The only rule it enforces is
/// that a token is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkToken(String);

impl WorkToken {
    /// Create a token, rejecting the empty string
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(StressError::EmptyToken);
        }
        Ok(Self(value))
    }

    /// Borrow the token contents
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token and return its contents
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for WorkToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WorkToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkToken {
    type Error = StressError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for WorkToken {
    type Error = StressError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<WorkToken> for String {
    fn from(token: WorkToken) -> Self {
        token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rejects_empty() {
        assert!(matches!(WorkToken::new(""), Err(StressError::EmptyToken)));
        assert!(WorkToken::try_from(String::new()).is_err());
    }

    #[test]
    fn test_token_is_opaque() {
        let token = WorkToken::new("abuse/file-7").unwrap();
        assert_eq!(token.as_str(), "abuse/file-7");
        assert_eq!(token.to_string(), "abuse/file-7");
        assert_eq!(token.into_inner(), "abuse/file-7");
    }

    #[test]
    fn test_token_deserialize_rejects_empty() {
        let ok: WorkToken = serde_json::from_str("\"branch-1\"").unwrap();
        assert_eq!(ok.as_str(), "branch-1");
        assert!(serde_json::from_str::<WorkToken>("\"\"").is_err());
    }
}
