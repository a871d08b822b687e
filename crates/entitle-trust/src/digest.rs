//! # Content Digests
//!
//! SHA-256 digests of canonical envelope content. The constructor takes
//! [`CanonicalBytes`], not raw byte slices, so every digest in the system
//! was computed from properly canonicalized data.

use sha2::{Digest, Sha256};

use entitle_wire::CanonicalBytes;

/// A SHA-256 digest of canonical content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Compute the digest of canonical bytes.
    pub fn compute(data: &CanonicalBytes) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data.as_bytes());
        Self(hasher.finalize().into())
    }

    /// The raw 32-byte digest value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The digest as a lowercase hex string — the wire form used in
    /// signature reference attributes.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Compare against a wire-form hex digest, tolerating case.
    pub fn matches_hex(&self, hex: &str) -> bool {
        self.to_hex().eq_ignore_ascii_case(hex)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entitle_wire::{canonical_item, Item};

    fn digest_of(item: &Item) -> ContentDigest {
        ContentDigest::compute(&canonical_item(item).unwrap())
    }

    #[test]
    fn digest_is_deterministic() {
        let item = Item::new("Licensee").with_property("number", "L001");
        assert_eq!(digest_of(&item), digest_of(&item));
    }

    #[test]
    fn different_content_different_digest() {
        let a = Item::new("Licensee").with_property("number", "L001");
        let b = Item::new("Licensee").with_property("number", "L002");
        assert_ne!(digest_of(&a), digest_of(&b));
    }

    #[test]
    fn hex_form_is_64_lowercase_chars() {
        let hex = digest_of(&Item::new("Product")).to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn matches_hex_tolerates_case() {
        let d = digest_of(&Item::new("Product"));
        assert!(d.matches_hex(&d.to_hex().to_uppercase()));
        assert!(!d.matches_hex(&"0".repeat(64)));
    }
}
