use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of a fetched page body
///
/// Byte-identical bodies always produce equal digests, whatever URL they came
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Computes the digest of `body`
    pub fn compute(body: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(body));
        Self(bytes)
    }

    /// Returns the lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_bodies_same_digest() {
        let a = ContentDigest::compute(b"<html>same</html>");
        let b = ContentDigest::compute(b"<html>same</html>");
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_byte_difference() {
        let a = ContentDigest::compute(b"<html>same</html>");
        let b = ContentDigest::compute(b"<html>Same</html>");
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            ContentDigest::compute(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_display_is_hex() {
        let d = ContentDigest::compute(b"abc");
        assert_eq!(format!("{}", d), d.to_hex());
        assert_eq!(d.to_hex().len(), 64);
    }
}
