//! HOTP (RFC 4226) and TOTP (RFC 6238) codes, compatible with the usual
//! authenticator apps.
//!
//! The free functions below take parameters the way an otpauth URI spells
//! them and validate all of them before any hashing. The typed layer in
//! [`params`], [`hotp`] and [`totp`] can't fail once its values exist.

#[macro_use]
extern crate log;

pub mod algorithm;
pub mod base32;
pub mod counter;
pub mod error;
pub mod hotp;
pub mod params;
pub mod secret;
pub mod totp;

pub use algorithm::Algorithm;
pub use error::{Error, Result};
pub use params::{Code, Digits, Otp, OtpKind, Period, Secret, DEFAULT_DIGITS, DEFAULT_PERIOD};

/// HOTP code for a base32 `secret` at `counter`.
pub fn hotp(secret: &str, counter: u64, digits: u32, algorithm: &str) -> Result<String> {
  let algorithm = algorithm.parse::<Algorithm>()?;
  let digits = Digits::new(digits)?;
  let secret = secret.parse::<Secret>()?;
  Ok(hotp::generate(&secret, counter, digits, algorithm))
}

/// TOTP code for a base32 `secret` at `time` (now if `None`), with the
/// seconds remaining before it changes.
pub fn totp(secret: &str, time: Option<u64>, period: u64, digits: u32, algorithm: &str) -> Result<(String, u64)> {
  let algorithm = algorithm.parse::<Algorithm>()?;
  let period = Period::new(period)?;
  let digits = Digits::new(digits)?;
  let secret = secret.parse::<Secret>()?;
  Ok(totp::generate(&secret, time, period, digits, algorithm))
}

/// Base32 secret made from `length` random alphanumeric characters.
pub fn random_secret(length: usize) -> String {
  secret::generate(length)
}
