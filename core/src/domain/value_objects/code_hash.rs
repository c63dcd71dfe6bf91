//! Salted one-way hash of a verification code
//!
//! The plaintext code exists only transiently for dispatch; the store only
//! ever sees this hash. Comparison is constant-time to avoid timing side
//! channels.

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of random salt bytes per code
const SALT_LEN: usize = 16;

/// Salted SHA-256 digest of a verification code, stored as
/// `<salt-hex>$<digest-hex>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeHash(String);

impl CodeHash {
    /// Derives the hash for a plaintext code with a fresh random salt
    pub fn derive(code: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let digest = Self::digest(&salt, code);
        Self(format!("{}${}", hex::encode(salt), hex::encode(digest)))
    }

    /// Reconstructs a hash from its stored string form
    pub fn from_stored(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    /// Constant-time comparison of a submitted code against this hash
    ///
    /// A malformed stored value never matches.
    pub fn matches(&self, code: &str) -> bool {
        let Some((salt_hex, digest_hex)) = self.0.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
            return false;
        };
        let actual = Self::digest(&salt, code);
        constant_time_eq(&actual, &expected)
    }

    /// Stored string form, suitable for persistence
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn digest(salt: &[u8], code: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(code.as_bytes());
        hasher.finalize().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_hash_matches_its_code() {
        let hash = CodeHash::derive("042719");
        assert!(hash.matches("042719"));
        assert!(!hash.matches("042718"));
    }

    #[test]
    fn plaintext_is_not_recoverable_from_stored_form() {
        let hash = CodeHash::derive("123456");
        assert!(!hash.as_str().contains("123456"));
    }

    #[test]
    fn same_code_hashes_differently_per_salt() {
        let a = CodeHash::derive("123456");
        let b = CodeHash::derive("123456");
        assert_ne!(a.as_str(), b.as_str());
        assert!(a.matches("123456"));
        assert!(b.matches("123456"));
    }

    #[test]
    fn malformed_stored_value_never_matches() {
        assert!(!CodeHash::from_stored("garbage").matches("123456"));
        assert!(!CodeHash::from_stored("nothex$nothex").matches("123456"));
    }

    #[test]
    fn round_trips_through_stored_form() {
        let hash = CodeHash::derive("007123");
        let restored = CodeHash::from_stored(hash.as_str());
        assert!(restored.matches("007123"));
    }
}
