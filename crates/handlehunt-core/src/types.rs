//! Shared types used across handlehunt.

use crate::error::HandleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum username length, in characters.
pub const MIN_USERNAME_CHARS: usize = 2;

/// Newtype for a validated username.
///
/// Usernames are trimmed and must be at least [`MIN_USERNAME_CHARS`] characters.
/// No other restriction applies: the value is substituted into profile URLs
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Create a new `Username` from a string.
    ///
    /// # Errors
    /// Returns error if the trimmed input is shorter than two characters.
    pub fn new(name: impl Into<String>) -> Result<Self, HandleError> {
        let name = name.into();
        let trimmed = name.trim();
        let chars = trimmed.chars().count();

        if chars < MIN_USERNAME_CHARS {
            return Err(HandleError::Validation(format!(
                "username must be at least {MIN_USERNAME_CHARS} characters long, got {chars}"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_valid() {
        let name = Username::new("eren").expect("valid username");
        assert_eq!(name.as_str(), "eren");
        assert_eq!(name.to_string(), "eren");

        assert!(Username::new("ab").is_ok());
        assert!(Username::new("çö").is_ok());
    }

    #[test]
    fn test_username_too_short() {
        assert!(Username::new("").is_err());
        assert!(Username::new("a").is_err());
        assert!(Username::new("  a  ").is_err());

        let err = Username::new("x").unwrap_err();
        assert!(matches!(err, HandleError::Validation(_)));
        assert!(err.to_string().contains("at least 2 characters"));
    }

    #[test]
    fn test_username_trimmed() {
        let name = Username::new("  eren\n").expect("valid username");
        assert_eq!(name.as_str(), "eren");
    }

    #[test]
    fn test_username_serde() {
        let name: Username = serde_json::from_str("\"eren\"").expect("deserialize username");
        assert_eq!(name.as_str(), "eren");
        assert_eq!(serde_json::to_string(&name).expect("serialize"), "\"eren\"");

        let short: Result<Username, _> = serde_json::from_str("\"e\"");
        assert!(short.is_err());
    }
}
