//! Short fingerprints of hierarchical job names.

/// Number of hex characters kept from the digest.
pub const SUFFIX_LEN: usize = 8;

/// First [`SUFFIX_LEN`] lowercase hex characters of the BLAKE3 digest of
/// `full_name`.
///
/// Two jobs whose names abbreviate to the same prefix still end up in
/// different directories. Collision avoidance only, not a security boundary.
pub fn name_suffix(full_name: &str) -> String {
    let hash = blake3::hash(full_name.as_bytes()).to_hex();
    hash[..SUFFIX_LEN].to_string()
}
