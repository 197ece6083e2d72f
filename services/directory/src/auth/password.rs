//! Password digests and the acceptance policy.
//!
//! # Purpose
//! Stores passwords as `salt$digest` where the digest is SHA-256 over
//! `salt || password`. The store trait is the seam where a deployment would
//! swap in a tunable KDF; handlers only see [`PasswordHash`] values.
use rand::RngCore;
use sha2::{Digest, Sha256};

const MIN_LENGTH: usize = 8;
const MIN_CLASSES: usize = 3;

/// Opaque salted password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

pub fn hash_password(plain: &str) -> PasswordHash {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    PasswordHash(format!("{}${}", hex::encode(salt), digest(&salt, plain)))
}

impl PasswordHash {
    pub fn verify(&self, plain: &str) -> bool {
        let Some((salt_hex, stored)) = self.0.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        digest(&salt, plain) == stored
    }
}

fn digest(salt: &[u8], plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

/// Server-side acceptance rule: length 8+, any 3 of upper/lower/digit/symbol.
/// Mirrors the console's policy table so a bypassed client cannot weaken it.
pub fn meets_policy(plain: &str) -> bool {
    let value = plain.trim();
    let classes = [
        value.chars().any(|c| c.is_ascii_uppercase()),
        value.chars().any(|c| c.is_ascii_lowercase()),
        value.chars().any(|c| c.is_ascii_digit()),
        value
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace()),
    ]
    .iter()
    .filter(|present| **present)
    .count();
    value.chars().count() >= MIN_LENGTH && classes >= MIN_CLASSES
}
