//! Password digests for locally stored users.
//!
//! Digests are unsalted single-round SHA-1, lowercase hex. This matches the
//! format already stored in existing `EmailUser` tables; changing the
//! algorithm changes the stored data format and needs a migration.

use sha1::{Digest, Sha1};

/// Length of a hex digest produced by [`hash_password`].
pub const DIGEST_LEN: usize = 40;

/// Compute the stored digest for a plaintext secret.
pub fn hash_password(secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
