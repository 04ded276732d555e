//! Key fingerprints and the key entries surfaced during verification.

use crate::error::ParseError;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A 32-byte key fingerprint: SHA-256 over the public key material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyFingerprint([u8; 32]);

impl KeyFingerprint {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Fingerprint of raw public key material.
    pub fn of_bytes(key_material: &[u8]) -> Self {
        let digest = Sha256::digest(key_material);
        Self(digest.into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form, as used in assertion clauses and proof sets.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for KeyFingerprint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| ParseError::InvalidFingerprint(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ParseError::InvalidFingerprint(s.to_string()))?;
        Ok(Self(arr))
    }
}

/// What a key is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyKind {
    Signing,
    Encryption,
}

/// A key entry on an identity, surfaced to the progress observer before
/// any network check begins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityKey {
    pub fingerprint: KeyFingerprint,
    pub kind: KeyKind,
    pub created_at: Timestamp,
}

impl IdentityKey {
    pub fn new(fingerprint: KeyFingerprint, kind: KeyKind, created_at: Timestamp) -> Self {
        Self {
            fingerprint,
            kind,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = KeyFingerprint::of_bytes(b"key material");
        let b = KeyFingerprint::of_bytes(b"key material");
        assert_eq!(a, b);
        assert_ne!(a, KeyFingerprint::of_bytes(b"other key"));
    }

    #[test]
    fn fingerprint_hex_roundtrip() {
        let fp = KeyFingerprint::of_bytes(b"abc");
        let parsed: KeyFingerprint = fp.to_hex().parse().unwrap();
        assert_eq!(parsed, fp);
    }

    #[test]
    fn fingerprint_rejects_short_hex() {
        assert!("deadbeef".parse::<KeyFingerprint>().is_err());
    }
}
