//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Encode bytes as standard base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// HMAC-SHA256 of `data`, URL-safe base64 without padding (cookie-safe)
pub fn sign(key: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    general_purpose::URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Check a signature produced by [`sign`]. Comparison is constant-time.
pub fn verify(key: &[u8], data: &[u8], signature_b64: &str) -> bool {
    let Ok(signature) = general_purpose::URL_SAFE_NO_PAD.decode(signature_b64) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_base64_roundtrip() {
        let data = b"hello world";
        let encoded = to_base64(data);
        let decoded = from_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_sign_known_value() {
        // RFC 4231 test case 2
        let sig = sign(b"Jefe", b"what do ya want for nothing?");
        let raw = general_purpose::URL_SAFE_NO_PAD.decode(sig).unwrap();
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_verify() {
        let key = [42u8; 32];
        let sig = sign(&key, b"session-id");

        assert!(verify(&key, b"session-id", &sig));
        assert!(!verify(&key, b"other-id", &sig));
        assert!(!verify(&[7u8; 32], b"session-id", &sig));
        assert!(!verify(&key, b"session-id", "not base64!"));
    }
}
