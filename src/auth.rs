//! Trigger authentication
//!
//! The report trigger is a privileged batch entry point: callers present the
//! configured service key as a bearer token. Tokens are compared as SHA-256
//! digests with a constant-time equality check, so the endpoint does not leak
//! key prefixes through timing. Only the digest is retained in memory.

use sha2::{Digest, Sha256};

/// Verifies bearer tokens against the configured service key.
#[derive(Debug, Clone)]
pub struct ServiceKeyVerifier {
    expected_digest: [u8; 32],
}

impl ServiceKeyVerifier {
    pub fn new(service_key: &str) -> Self {
        Self {
            expected_digest: Sha256::digest(service_key.as_bytes()).into(),
        }
    }

    /// Check an `Authorization` header value (`Bearer <key>`).
    pub fn verify_bearer(&self, authorization: Option<&str>) -> bool {
        let Some(header) = authorization else {
            return false;
        };
        let Some(token) = header.strip_prefix("Bearer ") else {
            return false;
        };
        let digest: [u8; 32] = Sha256::digest(token.trim().as_bytes()).into();
        constant_time_eq(&digest, &self.expected_digest)
    }

    /// Short fingerprint of the key digest for startup logs; never the key.
    pub fn fingerprint(&self) -> String {
        hex::encode(self.expected_digest)[..8].to_string()
    }
}

/// Byte-wise comparison without early exit. Inputs are fixed-length digests.
fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
