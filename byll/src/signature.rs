use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("request carries no signature header")]
    Missing,
    #[error("signature header is not of the form sha256=<hex>")]
    Malformed,
    #[error("signature does not match the request body")]
    Mismatch,
}

/// Checks `X-Hub-Signature-256` against the HMAC-SHA256 of the raw body.
pub fn verify_signature(
    app_secret: &[u8],
    header: Option<&str>,
    body: &[u8],
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;
    let hex_digest = header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or(SignatureError::Malformed)?;
    let expected = hex::decode(hex_digest).map_err(|_| SignatureError::Malformed)?;

    let mut mac = HmacSha256::new_from_slice(app_secret).map_err(|_| SignatureError::Mismatch)?;
    mac.update(body);
    // Constant-time comparison.
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Builds the header value a correctly signed request would carry.
#[cfg(test)]
pub fn sign(app_secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(app_secret).expect("HMAC takes keys of any length");
    mac.update(body);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SECRET: &[u8] = b"app-secret";
    const BODY: &[u8] = br#"{"object":"page","entry":[]}"#;

    #[test]
    fn accepts_matching_signature() {
        let header = sign(SECRET, BODY);

        assert_eq!(verify_signature(SECRET, Some(&header), BODY), Ok(()));
    }

    #[test]
    fn sign_produces_known_digest() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog")
        assert_eq!(
            sign(b"key", b"The quick brown fox jumps over the lazy dog"),
            "sha256=f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[rstest]
    #[case::missing(None, SignatureError::Missing)]
    #[case::sha1_header(Some("sha1=0123456789abcdef"), SignatureError::Malformed)]
    #[case::not_hex(Some("sha256=zz"), SignatureError::Malformed)]
    #[case::wrong_digest(
        Some("sha256=0000000000000000000000000000000000000000000000000000000000000000"),
        SignatureError::Mismatch
    )]
    #[case::truncated_digest(Some("sha256=00"), SignatureError::Mismatch)]
    fn rejects_bad_signatures(#[case] header: Option<&str>, #[case] expected: SignatureError) {
        assert_eq!(verify_signature(SECRET, header, BODY), Err(expected));
    }

    #[test]
    fn rejects_signature_of_other_body() {
        let header = sign(SECRET, b"{}");

        assert_eq!(
            verify_signature(SECRET, Some(&header), BODY),
            Err(SignatureError::Mismatch)
        );
    }
}
