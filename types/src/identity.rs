//! Identity identifiers and usernames.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 16-byte stable identity identifier.
///
/// This is the key for the result cache and the singleflight lock table.
/// It never changes for the lifetime of an identity, unlike the username.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityId([u8; 16]);

impl IdentityId {
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for IdentityId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| ParseError::InvalidIdentityId(s.to_string()))?;
        let arr: [u8; 16] = bytes
            .try_into()
            .map_err(|_| ParseError::InvalidIdentityId(s.to_string()))?;
        Ok(Self(arr))
    }
}

/// A normalized lowercase username: `[a-z0-9_]`, 2 to 16 characters,
/// starting with a letter or digit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Validate and normalize a username. Uppercase input is lowercased.
    pub fn new(s: impl AsRef<str>) -> Result<Self, ParseError> {
        let normalized = s.as_ref().trim().to_ascii_lowercase();
        if !Self::is_valid(&normalized) {
            return Err(ParseError::InvalidUsername(s.as_ref().to_string()));
        }
        Ok(Self(normalized))
    }

    fn is_valid(s: &str) -> bool {
        if s.len() < 2 || s.len() > 16 {
            return false;
        }
        let mut chars = s.chars();
        let first = chars.next().expect("length checked above");
        first.is_ascii_alphanumeric()
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Username {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
