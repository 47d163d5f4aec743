//! HOTP and TOTP code generation.
//!
//! HMAC over the big-endian counter, dynamic truncation per RFC 4226 §5.3,
//! and the RFC 6238 time-step layer on top. All entry points taking a
//! timestamp have a wall-clock twin; the `_at` forms are the ones tests use.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::otp::secret::decode_secret;
use crate::otp::types::{Algorithm, GeneratedCode, OtpError, OtpErrorKind};

/// Largest supported code length. 10^9 still fits a u32, 10^10 does not.
pub const MAX_DIGITS: u8 = 9;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Parameter checks
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub(crate) fn check_digits(digits: u8) -> Result<(), OtpError> {
    if digits == 0 || digits > MAX_DIGITS {
        return Err(OtpError::new(
            OtpErrorKind::InvalidDigits,
            format!("digits must be 1..={}, got {}", MAX_DIGITS, digits),
        ));
    }
    Ok(())
}

pub(crate) fn check_period(period: u32) -> Result<(), OtpError> {
    if period == 0 {
        return Err(OtpError::new(
            OtpErrorKind::InvalidPeriod,
            "period must be non-zero",
        ));
    }
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HMAC + dynamic truncation (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// HMAC(key, message) with the selected hash.
///
/// HMAC accepts any key length, so a construction failure means the backend
/// itself is unusable; it surfaces as `CryptoFailure`, never as a code.
fn hmac_digest(key: &[u8], message: &[u8], algo: Algorithm) -> Result<Vec<u8>, OtpError> {
    let backend_err = |e: hmac::digest::InvalidLength| {
        OtpError::new(OtpErrorKind::CryptoFailure, "HMAC construction failed")
            .with_detail(e.to_string())
    };
    Ok(match algo {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).map_err(backend_err)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(backend_err)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(backend_err)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
    })
}

/// Dynamic truncation: the low nibble of the last digest byte picks a 4-byte
/// window; its top bit is masked off so the value is an unambiguous 31-bit
/// integer, then reduced mod 10^digits and left zero-padded.
fn dynamic_truncate(digest: &[u8], digits: u8) -> String {
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);
    let code = binary % 10u32.pow(digits as u32);
    format!("{code:0>width$}", width = digits as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOTP (counter-based, RFC 4226)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code from raw key bytes.
///
/// The counter is encoded as exactly 8 bytes, most-significant first.
pub fn hotp_from_key(
    key: &[u8],
    counter: u64,
    digits: u8,
    algo: Algorithm,
) -> Result<String, OtpError> {
    check_digits(digits)?;
    if key.is_empty() {
        return Err(OtpError::new(OtpErrorKind::InvalidSecret, "key is empty"));
    }
    let digest = hmac_digest(key, &counter.to_be_bytes(), algo)?;
    Ok(dynamic_truncate(&digest, digits))
}

/// Compute an HOTP code from a base-32 secret.
pub fn generate_hotp(
    secret_b32: &str,
    counter: u64,
    digits: u8,
    algo: Algorithm,
) -> Result<String, OtpError> {
    let key = decode_secret(secret_b32)?;
    hotp_from_key(&key, counter, digits, algo)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time-step helpers (RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// The fallible APIs reject period == 0 up front; these bare helpers clamp
// to 1 so they stay total instead of dividing by zero.

/// Time-step counter for a given unix timestamp.
pub fn time_step_at(unix_seconds: u64, period: u32) -> u64 {
    unix_seconds / u64::from(period.max(1))
}

/// Time-step counter at the current time.
pub fn time_step(period: u32) -> u64 {
    time_step_at(current_unix_time(), period)
}

/// Seconds until the step counter next increments. A timestamp exactly on a
/// step boundary gets the full period, not zero.
pub fn seconds_remaining_at(unix_seconds: u64, period: u32) -> u32 {
    let p = u64::from(period.max(1));
    (p - (unix_seconds % p)) as u32
}

/// Seconds remaining in the current step.
pub fn seconds_remaining(period: u32) -> u32 {
    seconds_remaining_at(current_unix_time(), period)
}

/// Fraction of the step already elapsed (0.0 fresh, approaching 1.0).
pub fn progress_fraction_at(unix_seconds: u64, period: u32) -> f64 {
    let p = u64::from(period.max(1));
    (unix_seconds % p) as f64 / p as f64
}

/// Progress fraction at the current time.
pub fn progress_fraction(period: u32) -> f64 {
    progress_fraction_at(current_unix_time(), period)
}

pub(crate) fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP (time-based, RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate a TOTP code at an explicit unix timestamp.
pub fn generate_totp_at(
    secret_b32: &str,
    digits: u8,
    period: u32,
    algo: Algorithm,
    unix_seconds: u64,
) -> Result<String, OtpError> {
    check_period(period)?;
    generate_hotp(secret_b32, time_step_at(unix_seconds, period), digits, algo)
}

/// Generate a TOTP code at the current time.
pub fn generate_totp(
    secret_b32: &str,
    digits: u8,
    period: u32,
    algo: Algorithm,
) -> Result<String, OtpError> {
    generate_totp_at(secret_b32, digits, period, algo, current_unix_time())
}

/// Generate a TOTP code with its timing context, at an explicit timestamp.
pub fn generate_snapshot_at(
    secret_b32: &str,
    digits: u8,
    period: u32,
    algo: Algorithm,
    unix_seconds: u64,
) -> Result<GeneratedCode, OtpError> {
    check_period(period)?;
    let counter = time_step_at(unix_seconds, period);
    let code = generate_hotp(secret_b32, counter, digits, algo)?;
    Ok(GeneratedCode {
        code,
        remaining_seconds: seconds_remaining_at(unix_seconds, period),
        period,
        progress: progress_fraction_at(unix_seconds, period),
        counter,
    })
}

/// Generate a TOTP code with its timing context, at the current time.
pub fn generate_snapshot(
    secret_b32: &str,
    digits: u8,
    period: u32,
    algo: Algorithm,
) -> Result<GeneratedCode, OtpError> {
    generate_snapshot_at(secret_b32, digits, period, algo, current_unix_time())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Display helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Split a code in half with a space for display (e.g. "123 456").
pub fn format_code_display(code: &str) -> String {
    if code.len() <= 4 {
        return code.to_string();
    }
    let mid = code.len() / 2;
    format!("{} {}", &code[..mid], &code[mid..])
}
