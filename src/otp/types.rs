//! Shared types for the OTP engine.

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hash function used for the HMAC step.
///
/// SHA-1 is the interoperable default; authenticator apps almost universally
/// assume it. SHA-256 and SHA-512 are the RFC 6238 §1.2 variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Sha1
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Sha512 => write!(f, "SHA512"),
        }
    }
}

impl Algorithm {
    /// Parse from a case-insensitive string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SHA1" | "SHA-1" | "HMACSHA1" | "HMAC-SHA1" => Some(Self::Sha1),
            "SHA256" | "SHA-256" | "HMACSHA256" | "HMAC-SHA256" => Some(Self::Sha256),
            "SHA512" | "SHA-512" | "HMACSHA512" | "HMAC-SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What went wrong.
///
/// `CryptoFailure` means the HMAC primitive itself could not be driven and
/// is deliberately distinct from every input-shaped error: a caller must be
/// able to tell "broken environment" apart from "bad secret or code".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpErrorKind {
    /// Secret is empty, not base-32, or decodes to zero bytes.
    InvalidSecret,
    /// Digit count outside the supported 1..=9 range.
    InvalidDigits,
    /// Time-step period of zero.
    InvalidPeriod,
    /// The HMAC backend could not be constructed or driven.
    CryptoFailure,
}

/// Crate-level error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpError {
    pub kind: OtpErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for OtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for OtpError {}

impl OtpError {
    pub fn new(kind: OtpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<OtpError> for String {
    fn from(e: OtpError) -> String {
        e.to_string()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generated code
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A generated TOTP code together with its timing context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// The code string (e.g. "123456"), always exactly `digits` long.
    pub code: String,
    /// Seconds until the code rolls over.
    pub remaining_seconds: u32,
    /// Time-step period in seconds.
    pub period: u32,
    /// Fraction of the period already elapsed, 0.0 fresh to 1.0 expiring.
    pub progress: f64,
    /// The time-step counter the code was derived from.
    pub counter: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of checking a candidate code.
///
/// A wrong code is `valid == false`, not an error; errors are reserved for
/// bad parameters, bad secrets and crypto failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    pub valid: bool,
    /// Steps (TOTP) or counters (HOTP) off the caller's reference point;
    /// 0 for an exact match.
    pub drift: i64,
    /// The counter value that matched, if any.
    pub matched_counter: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Algorithm ────────────────────────────────────────────────

    #[test]
    fn algorithm_default_is_sha1() {
        assert_eq!(Algorithm::default(), Algorithm::Sha1);
    }

    #[test]
    fn algorithm_display() {
        assert_eq!(Algorithm::Sha1.to_string(), "SHA1");
        assert_eq!(Algorithm::Sha256.to_string(), "SHA256");
        assert_eq!(Algorithm::Sha512.to_string(), "SHA512");
    }

    #[test]
    fn algorithm_from_str_loose() {
        assert_eq!(Algorithm::from_str_loose("sha1"), Some(Algorithm::Sha1));
        assert_eq!(Algorithm::from_str_loose("SHA-256"), Some(Algorithm::Sha256));
        assert_eq!(Algorithm::from_str_loose("HMAC-SHA512"), Some(Algorithm::Sha512));
        assert_eq!(Algorithm::from_str_loose("MD5"), None);
    }

    #[test]
    fn algorithm_serde_roundtrip() {
        let json = serde_json::to_string(&Algorithm::Sha256).unwrap();
        assert_eq!(json, "\"SHA256\"");
        let back: Algorithm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Algorithm::Sha256);
    }

    // ── OtpError ─────────────────────────────────────────────────

    #[test]
    fn error_display() {
        let err = OtpError::new(OtpErrorKind::InvalidSecret, "not base-32")
            .with_detail("offending input: !!!");
        let s = err.to_string();
        assert!(s.contains("InvalidSecret"));
        assert!(s.contains("not base-32"));
        assert!(s.contains("offending input"));
    }

    #[test]
    fn error_into_string() {
        let err = OtpError::new(OtpErrorKind::InvalidPeriod, "period must be non-zero");
        let s: String = err.into();
        assert!(s.contains("InvalidPeriod"));
    }

    #[test]
    fn error_is_std_error() {
        fn takes_err(_: &dyn std::error::Error) {}
        let err = OtpError::new(OtpErrorKind::CryptoFailure, "backend unavailable");
        takes_err(&err);
    }

    // ── GeneratedCode / VerifyResult ─────────────────────────────

    #[test]
    fn generated_code_serde() {
        let code = GeneratedCode {
            code: "123456".into(),
            remaining_seconds: 15,
            period: 30,
            progress: 0.5,
            counter: 55755375,
        };
        let json = serde_json::to_string(&code).unwrap();
        let back: GeneratedCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, "123456");
        assert_eq!(back.counter, 55755375);
    }

    #[test]
    fn verify_result_serde() {
        let vr = VerifyResult {
            valid: true,
            drift: -1,
            matched_counter: Some(100),
        };
        let json = serde_json::to_string(&vr).unwrap();
        let back: VerifyResult = serde_json::from_str(&json).unwrap();
        assert!(back.valid);
        assert_eq!(back.drift, -1);
        assert_eq!(back.matched_counter, Some(100));
    }
}
