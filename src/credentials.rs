//! Credentials
//!
//! Salted one-way hashing of member secrets.
//!
//! ## Stored Format
//! ```text
//! sha256$<iterations>$<salt hex>$<digest hex>
//! ```
//!
//! The digest is SHA-256 over `salt || secret`, re-hashed as
//! `SHA-256(salt || previous)` for the remaining iterations.
//! Comparison is constant-time in the digest length.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Scheme tag at the start of every stored hash
pub const SCHEME: &str = "sha256";

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Hash used to burn the same work when a member id is unknown
///
/// No secret matches its all-zero digest.
pub(crate) fn dummy_hash(iterations: u32) -> String {
    format!(
        "{}${}${}${}",
        SCHEME,
        iterations.max(1),
        hex::encode([0u8; SALT_LEN]),
        hex::encode([0u8; 32])
    )
}

/// Hash a secret with a fresh random salt
pub fn hash_secret(secret: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let iterations = iterations.max(1);
    let digest = derive(&salt, secret.as_bytes(), iterations);

    format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        hex::encode(salt),
        hex::encode(digest)
    )
}

/// Check a secret against a stored hash
///
/// A malformed stored hash never verifies.
pub fn verify_secret(secret: &str, stored: &str) -> bool {
    let Some((iterations, salt, expected)) = parse_stored(stored) else {
        return false;
    };

    let actual = derive(&salt, secret.as_bytes(), iterations);
    constant_time_eq(&actual, &expected)
}

// =============================================================================
// Private Helpers
// =============================================================================

fn parse_stored(stored: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = stored.split('$');
    if parts.next()? != SCHEME {
        return None;
    }

    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = hex::decode(parts.next()?).ok()?;
    let digest = hex::decode(parts.next()?).ok()?;

    if parts.next().is_some() || iterations == 0 || digest.len() != 32 {
        return None;
    }

    Some((iterations, salt, digest))
}

fn derive(salt: &[u8], secret: &[u8], iterations: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret);
    let mut digest: [u8; 32] = hasher.finalize().into();

    for _ in 1..iterations {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(digest);
        digest = hasher.finalize().into();
    }

    digest
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
