//! Content hash value object

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 of a clipboard text payload, hex encoded.
///
/// Stable across runs so that hashes survive persistence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash a text payload
    pub fn of(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        Self(hex::encode(digest))
    }

    /// Hex representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_text_equal_hash() {
        assert_eq!(ContentHash::of("hello"), ContentHash::of("hello"));
    }

    #[test]
    fn different_text_different_hash() {
        assert_ne!(ContentHash::of("hello"), ContentHash::of("Hello"));
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            ContentHash::of("hello").as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
