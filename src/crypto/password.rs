//! Salted password digests using PBKDF2-HMAC-SHA256
//!
//! A digest is only meaningful together with the salt that produced it, so
//! both live in one value and are always read and replaced together.

use pbkdf2::pbkdf2_hmac;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::secure_memory::SecureString;

/// Salt size in bytes
pub const SALT_LEN: usize = 16;

/// Digest size in bytes
pub const HASH_LEN: usize = 32;

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A salt together with the digest it produced
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordDigest {
    #[serde(with = "base64_bytes")]
    salt: [u8; SALT_LEN],
    #[serde(rename = "password_hash", with = "base64_bytes")]
    hash: [u8; HASH_LEN],
}

impl PasswordDigest {
    /// Hash a password with a fresh random salt
    pub fn create(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        Self::with_salt(password, salt)
    }

    /// Hash a password with a known salt
    pub fn with_salt(password: &str, salt: [u8; SALT_LEN]) -> Self {
        let mut hash = [0u8; HASH_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);
        Self { salt, hash }
    }

    /// Recompute the digest for `candidate` and compare in constant time
    pub fn verify(&self, candidate: &str) -> bool {
        let recomputed = Self::with_salt(candidate, self.salt);
        self.hash.ct_eq(&recomputed.hash).into()
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn hash(&self) -> &[u8; HASH_LEN] {
        &self.hash
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordDigest").finish_non_exhaustive()
    }
}

/// Generate a random alphanumeric password for a new credential
pub fn generate_initial_password(length: usize) -> SecureString {
    let password: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();
    SecureString::new(password)
}

/// Serde helper storing fixed-size byte arrays as base64 strings
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let decoded = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| D::Error::custom(format!("invalid base64: {}", e)))?;
        let len = decoded.len();
        decoded
            .try_into()
            .map_err(|_| D::Error::custom(format!("expected {} bytes, got {}", N, len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_correct_password() {
        let digest = PasswordDigest::create("correct horse");
        assert!(digest.verify("correct horse"));
    }

    #[test]
    fn test_verify_wrong_password() {
        let digest = PasswordDigest::create("correct horse");
        assert!(!digest.verify("correct horse "));
        assert!(!digest.verify(""));
        assert!(!digest.verify("Correct horse"));
    }

    #[test]
    fn test_same_salt_same_digest() {
        let salt = [7u8; SALT_LEN];
        let a = PasswordDigest::with_salt("secret", salt);
        let b = PasswordDigest::with_salt("secret", salt);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fresh_salt_per_digest() {
        let a = PasswordDigest::create("secret");
        let b = PasswordDigest::create("secret");
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_iteration_count_pinned() {
        let salt = *b"0123456789abcdef";
        let mut expected = [0u8; HASH_LEN];
        pbkdf2_hmac::<Sha256>(b"asd", &salt, 100_000, &mut expected);
        let digest = PasswordDigest::with_salt("asd", salt);
        assert_eq!(digest.hash(), &expected);
    }

    #[test]
    fn test_serialization_keeps_pair() {
        let digest = PasswordDigest::create("secret");
        let json = serde_json::to_value(&digest).unwrap();
        assert!(json.get("salt").is_some());
        assert!(json.get("password_hash").is_some());

        let back: PasswordDigest = serde_json::from_value(json).unwrap();
        assert!(back.verify("secret"));
    }

    #[test]
    fn test_truncated_salt_rejected() {
        let json = r#"{"salt": "AAAA", "password_hash": "AAAA"}"#;
        assert!(serde_json::from_str::<PasswordDigest>(json).is_err());
    }

    #[test]
    fn test_debug_hides_bytes() {
        let digest = PasswordDigest::create("secret");
        let debug = format!("{:?}", digest);
        assert!(!debug.contains("salt"));
    }

    #[test]
    fn test_initial_password() {
        let a = generate_initial_password(16);
        let b = generate_initial_password(16);
        assert_eq!(a.len(), 16);
        assert!(a.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a.as_str(), b.as_str());
    }
}
