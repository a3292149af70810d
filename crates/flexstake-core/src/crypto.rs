// crates/flexstake-core/src/crypto.rs

use sha2::{Digest, Sha256};

/// Domain prefix mixed into label-derived account ids so they cannot collide
/// with hashes of the same bytes computed for other purposes.
const LABEL_DOMAIN: &[u8] = b"flexstake:account:";

/// Compute SHA-256 hash of the given bytes.
///
/// Returns a 32-byte hash.
pub fn hash_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Derive the 32-byte key for a human-readable account label.
pub fn hash_label(label: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(LABEL_DOMAIN);
    hasher.update(label.as_bytes());
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
