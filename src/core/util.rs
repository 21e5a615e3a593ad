//! Common utilities

use xxhash_rust::xxh3::xxh3_64;

/// Compute a stable hex hash of bytes
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}

/// Fold a header-map key for case-insensitive comparison.
///
/// Only ASCII letters are folded, matching the on-disk header map format.
pub fn fold_ascii(key: &str) -> String {
    key.to_ascii_lowercase()
}
