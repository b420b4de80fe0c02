//! One-way credential hashing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// One-way transform from plaintext password to a comparable digest.
pub trait CredentialHasher {
    fn hash(&self, plaintext: &str) -> String;

    /// Compares `plaintext` against a stored digest without early exit.
    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        constant_time_eq(self.hash(plaintext).as_bytes(), digest.as_bytes())
    }
}

/// Unsalted SHA-256, base64 encoded.
///
/// Matches digests written by earlier releases of the records database, so
/// existing accounts keep working.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256CredentialHasher;

impl CredentialHasher for Sha256CredentialHasher {
    fn hash(&self, plaintext: &str) -> String {
        let digest = Sha256::digest(plaintext.as_bytes());
        STANDARD.encode(digest)
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
