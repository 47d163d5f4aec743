//! # otpkit – one-time password engine
//!
//! Time-based and counter-based one-time passwords:
//!
//! - **RFC 4226** – HOTP with dynamic truncation, 1–9 digit codes
//! - **RFC 6238** – TOTP on top of HOTP, with SHA-1, SHA-256 and SHA-512
//! - **Verification** – drift-window scanning (TOTP) and counter look-ahead
//!   (HOTP) with constant-time code comparison
//! - **Secrets** – base-32 decoding and encoding with lenient input
//!   normalisation (case, spaces, dashes, trailing padding)
//!
//! The crate holds no state and never stores a secret; callers pass the
//! base-32 secret on every call. Every time-dependent operation has an
//! `*_at` twin taking an explicit unix timestamp, which is also how tests
//! pin the clock.

pub mod otp;
