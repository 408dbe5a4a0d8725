//! Paystack webhook signature verification.
//!
//! Paystack signs the raw request body with HMAC-SHA512 keyed by the
//! account secret and sends the hex digest in `x-paystack-signature`.

use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Verify a webhook signature against the raw body. Comparison is
/// constant-time; malformed hex fails closed.
pub fn verify_signature(secret: &[u8], body: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha512::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &[u8], body: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(secret).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_accepted() {
        let body = br#"{"event":"charge.success"}"#;
        let sig = sign(b"sk_test_abc", body);
        assert!(verify_signature(b"sk_test_abc", body, &sig));
    }

    #[test]
    fn wrong_secret_rejected() {
        let body = br#"{"event":"charge.success"}"#;
        let sig = sign(b"sk_test_abc", body);
        assert!(!verify_signature(b"sk_test_other", body, &sig));
    }

    #[test]
    fn tampered_body_rejected() {
        let sig = sign(b"sk_test_abc", br#"{"event":"charge.success"}"#);
        assert!(!verify_signature(
            b"sk_test_abc",
            br#"{"event":"charge.failed"}"#,
            &sig
        ));
    }

    #[test]
    fn malformed_hex_rejected() {
        assert!(!verify_signature(b"sk_test_abc", b"{}", "not-hex!"));
        assert!(!verify_signature(b"sk_test_abc", b"{}", ""));
    }
}
