//! Base-32 secret handling (RFC 4648 alphabet `A–Z2–7`).
//!
//! Secrets arrive as human-typed text: mixed case, grouped with spaces or
//! dashes, sometimes carrying trailing `=` padding. Normalisation accepts
//! all of that; anything else in the input is an error, never skipped.

use crate::otp::types::{OtpError, OtpErrorKind};

/// Strip grouping characters and trailing padding, uppercase the rest.
fn normalise(b32: &str) -> String {
    b32.replace(' ', "")
        .replace('-', "")
        .trim_end_matches('=')
        .to_uppercase()
}

/// Decode a base-32 secret into raw key bytes.
///
/// Trailing bits that do not complete a byte are discarded, matching the
/// unpadded base-32-to-binary conversion authenticator secrets use. A secret
/// that decodes to zero bytes is rejected: there is no key to HMAC with.
pub fn decode_secret(b32: &str) -> Result<Vec<u8>, OtpError> {
    let cleaned = normalise(b32);
    let bytes = base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &cleaned)
        .ok_or_else(|| {
            OtpError::new(OtpErrorKind::InvalidSecret, "secret is not valid base-32")
        })?;
    if bytes.is_empty() {
        return Err(OtpError::new(
            OtpErrorKind::InvalidSecret,
            "secret decodes to zero bytes",
        ));
    }
    Ok(bytes)
}

/// Encode raw bytes as base-32 (uppercase, no padding).
pub fn encode_secret(bytes: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, bytes)
}

/// Cheap pre-check for input forms: does this look like a usable secret?
pub fn is_valid_base32(s: &str) -> bool {
    decode_secret(s).is_ok()
}
