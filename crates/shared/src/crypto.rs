//! Webhook signature signing and verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs a payload with HMAC-SHA256 and returns the signature as hex.
///
/// Used to produce the `X-Signature` value for outbound calls and in
/// tests for building valid inbound webhook requests.
pub fn sign_hmac_sha256(secret: &str, payload: &[u8]) -> String {
    // HMAC accepts keys of any length, so new_from_slice cannot fail
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a hex-encoded HMAC-SHA256 signature over a payload.
///
/// Comparison happens inside `Mac::verify_slice`, which is constant-time.
/// Returns false for malformed hex input rather than erroring, so callers
/// treat any failure uniformly as an invalid signature.
pub fn verify_hmac_sha256(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let secret = "whsec_test_secret";
        let payload = br#"{"provider_ref":"chg_123","status":"succeeded"}"#;

        let signature = sign_hmac_sha256(secret, payload);
        assert_eq!(signature.len(), 64); // 32 bytes hex-encoded
        assert!(verify_hmac_sha256(secret, payload, &signature));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let payload = b"payload";
        let signature = sign_hmac_sha256("secret_a", payload);
        assert!(!verify_hmac_sha256("secret_b", payload, &signature));
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let secret = "whsec_test_secret";
        let signature = sign_hmac_sha256(secret, b"original");
        assert!(!verify_hmac_sha256(secret, b"tampered", &signature));
    }

    #[test]
    fn test_verify_rejects_malformed_hex() {
        assert!(!verify_hmac_sha256("secret", b"payload", "not-hex!!"));
        assert!(!verify_hmac_sha256("secret", b"payload", ""));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let secret = "whsec_test_secret";
        let payload = b"same payload";
        assert_eq!(
            sign_hmac_sha256(secret, payload),
            sign_hmac_sha256(secret, payload)
        );
    }
}
