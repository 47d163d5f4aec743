//! Candidate-code verification.
//!
//! TOTP codes are checked against a window of time-steps around "now" to
//! tolerate clock drift between prover and verifier; HOTP codes are checked
//! forward-only from the stored counter (resynchronisation). Comparison is
//! constant-time over the code bytes.

use crate::otp::core;
use crate::otp::secret::decode_secret;
use crate::otp::types::{Algorithm, OtpError, VerifyResult};

/// Verify a TOTP candidate at an explicit unix timestamp.
///
/// Every counter in `[step - drift_window, step + drift_window]` is
/// recomputed and compared; a match anywhere in the window is accepted and
/// reported with its signed drift. A candidate of the wrong length or with
/// non-digit characters can never match and is a clean non-match, not an
/// error.
pub fn verify_totp_at(
    secret_b32: &str,
    code: &str,
    drift_window: u32,
    digits: u8,
    period: u32,
    algo: Algorithm,
    unix_seconds: u64,
) -> Result<VerifyResult, OtpError> {
    core::check_digits(digits)?;
    core::check_period(period)?;
    let key = decode_secret(secret_b32)?;

    if !code_shape_ok(code, digits) {
        return Ok(no_match());
    }

    let base = core::time_step_at(unix_seconds, period);
    let start = base.saturating_sub(u64::from(drift_window));
    let end = base.saturating_add(u64::from(drift_window));

    for counter in start..=end {
        let expected = core::hotp_from_key(&key, counter, digits, algo)?;
        if constant_time_eq(expected.as_bytes(), code.as_bytes()) {
            let drift = counter as i64 - base as i64;
            if drift != 0 {
                log::debug!("totp code matched {} step(s) off the current time", drift);
            }
            return Ok(VerifyResult {
                valid: true,
                drift,
                matched_counter: Some(counter),
            });
        }
    }

    Ok(no_match())
}

/// Verify a TOTP candidate at the current time.
pub fn verify_totp(
    secret_b32: &str,
    code: &str,
    drift_window: u32,
    digits: u8,
    period: u32,
    algo: Algorithm,
) -> Result<VerifyResult, OtpError> {
    verify_totp_at(
        secret_b32,
        code,
        drift_window,
        digits,
        period,
        algo,
        core::current_unix_time(),
    )
}

/// Verify an HOTP candidate against a counter, scanning forward only.
///
/// The prover's counter can run ahead of the verifier's (button presses that
/// never reached the server), so `[counter, counter + look_ahead]` is
/// scanned; it never runs backward, a replayed earlier code must not pass.
pub fn verify_hotp(
    secret_b32: &str,
    code: &str,
    counter: u64,
    look_ahead: u32,
    digits: u8,
    algo: Algorithm,
) -> Result<VerifyResult, OtpError> {
    core::check_digits(digits)?;
    let key = decode_secret(secret_b32)?;

    if !code_shape_ok(code, digits) {
        return Ok(no_match());
    }

    let end = counter.saturating_add(u64::from(look_ahead));
    for c in counter..=end {
        let expected = core::hotp_from_key(&key, c, digits, algo)?;
        if constant_time_eq(expected.as_bytes(), code.as_bytes()) {
            let drift = (c - counter) as i64;
            if drift != 0 {
                log::debug!("hotp code matched {} counter(s) ahead", drift);
            }
            return Ok(VerifyResult {
                valid: true,
                drift,
                matched_counter: Some(c),
            });
        }
    }

    Ok(no_match())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Internals
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn no_match() -> VerifyResult {
    VerifyResult {
        valid: false,
        drift: 0,
        matched_counter: None,
    }
}

fn code_shape_ok(code: &str, digits: u8) -> bool {
    code.len() == digits as usize && code.bytes().all(|b| b.is_ascii_digit())
}

/// Byte-wise comparison that touches every position regardless of where the
/// first difference is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
