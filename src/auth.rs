//! Password hashing.
//!
//! The stored credential is a single unsalted SHA-256 digest of the
//! password, uppercase hex encoded. This matches the schema the system
//! inherited; it is a known weakness of that schema, not a recommendation.

use sha2::{Digest, Sha256};

/// Hash a password for storage or comparison.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    hex::encode_upper(digest)
}

/// Compare a candidate password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}
