//! # Ed25519 Keys and Signatures
//!
//! Thin wrappers over `ed25519_dalek` with workspace conventions: signing
//! only accepts [`CanonicalBytes`], and public key material travels as
//! stripped base64 — the header/footer/newline-removed form callers
//! extract from a PEM-style key file.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::{Signer, Verifier};
use rand_core::OsRng;

use entitle_wire::CanonicalBytes;

use crate::error::TrustError;

/// An Ed25519 signing (private) key.
///
/// Lives on the producer side: the licensing service signs validation
/// documents, and the test suite signs fixtures. The client itself only
/// ever verifies.
pub struct SigningKey(ed25519_dalek::SigningKey);

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        Self(ed25519_dalek::SigningKey::generate(&mut OsRng))
    }

    /// Create a signing key from a raw 32-byte secret.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(bytes))
    }

    /// The raw 32-byte secret.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Sign canonical bytes.
    pub fn sign(&self, data: &CanonicalBytes) -> SignatureBytes {
        SignatureBytes(self.0.sign(data.as_bytes()))
    }

    /// The corresponding verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }
}

/// An Ed25519 verifying (public) key.
#[derive(Debug, Clone)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

impl VerifyingKey {
    /// Create a verifying key from a raw 32-byte public key.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::InvalidKey`] when the bytes are not a valid
    /// curve point.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, TrustError> {
        ed25519_dalek::VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|e| TrustError::InvalidKey(e.to_string()))
    }

    /// Decode a public key from its stripped base64 form.
    ///
    /// Interior whitespace is tolerated so a caller that concatenated PEM
    /// body lines without joining them still parses.
    pub fn from_stripped_base64(encoded: &str) -> Result<Self, TrustError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let raw = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| TrustError::InvalidKey(format!("base64 decode failed: {e}")))?;
        let bytes: [u8; 32] = raw.as_slice().try_into().map_err(|_| {
            TrustError::InvalidKey(format!("expected 32 key bytes, got {}", raw.len()))
        })?;
        Self::from_bytes(&bytes)
    }

    /// The stripped base64 form of this key.
    pub fn to_stripped_base64(&self) -> String {
        BASE64.encode(self.0.as_bytes())
    }

    /// Verify a signature over canonical bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::InvalidSignatureValue`] when the signature
    /// does not verify under this key.
    pub fn verify(&self, data: &CanonicalBytes, signature: &SignatureBytes) -> Result<(), TrustError> {
        self.0
            .verify(data.as_bytes(), &signature.0)
            .map_err(|e| TrustError::InvalidSignatureValue(e.to_string()))
    }
}

/// An Ed25519 signature (64 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBytes(ed25519_dalek::Signature);

impl SignatureBytes {
    /// Decode a signature from base64.
    pub fn from_base64(encoded: &str) -> Result<Self, TrustError> {
        let raw = BASE64
            .decode(encoded.trim().as_bytes())
            .map_err(|e| TrustError::InvalidSignatureValue(format!("base64 decode failed: {e}")))?;
        let bytes: [u8; 64] = raw.as_slice().try_into().map_err(|_| {
            TrustError::InvalidSignatureValue(format!(
                "expected 64 signature bytes, got {}",
                raw.len()
            ))
        })?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(&bytes)))
    }

    /// The base64 wire form.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entitle_wire::{canonical_item, Item};

    fn canonical() -> CanonicalBytes {
        canonical_item(&Item::new("Licensee").with_property("number", "L001")).unwrap()
    }

    #[test]
    fn sign_verify_roundtrip() {
        let sk = SigningKey::generate();
        let sig = sk.sign(&canonical());
        assert!(sk.verifying_key().verify(&canonical(), &sig).is_ok());
    }

    #[test]
    fn wrong_key_fails() {
        let sig = SigningKey::generate().sign(&canonical());
        let other = SigningKey::generate().verifying_key();
        assert!(other.verify(&canonical(), &sig).is_err());
    }

    #[test]
    fn stripped_base64_roundtrip() {
        let vk = SigningKey::generate().verifying_key();
        let encoded = vk.to_stripped_base64();
        let decoded = VerifyingKey::from_stripped_base64(&encoded).unwrap();
        assert_eq!(vk.to_stripped_base64(), decoded.to_stripped_base64());
    }

    #[test]
    fn key_decode_tolerates_interior_newlines() {
        let vk = SigningKey::generate().verifying_key();
        let encoded = vk.to_stripped_base64();
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{head}\n{tail}");
        assert!(VerifyingKey::from_stripped_base64(&wrapped).is_ok());
    }

    #[test]
    fn key_decode_rejects_wrong_length() {
        let err = VerifyingKey::from_stripped_base64("c2hvcnQ=").unwrap_err();
        assert!(format!("{err}").contains("32"));
    }

    #[test]
    fn key_decode_rejects_bad_base64() {
        assert!(VerifyingKey::from_stripped_base64("!!not-base64!!").is_err());
    }

    #[test]
    fn signature_base64_roundtrip() {
        let sig = SigningKey::generate().sign(&canonical());
        let back = SignatureBytes::from_base64(&sig.to_base64()).unwrap();
        assert_eq!(sig, back);
    }

    #[test]
    fn signature_decode_rejects_wrong_length() {
        let err = SignatureBytes::from_base64("c2hvcnQ=").unwrap_err();
        assert!(format!("{err}").contains("64"));
    }

    #[test]
    fn secret_key_bytes_roundtrip() {
        let sk = SigningKey::generate();
        let restored = SigningKey::from_bytes(&sk.to_bytes());
        let sig = restored.sign(&canonical());
        assert!(sk.verifying_key().verify(&canonical(), &sig).is_ok());
    }
}
