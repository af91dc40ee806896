//! Typed OTP parameters, validated once where text or numbers come in.

use std::{
  fmt,
  num::{NonZeroU32, NonZeroU64},
  str::FromStr,
};

use crate::{
  algorithm::Algorithm,
  base32,
  error::{Error, Result},
  hotp, totp,
};

pub const DEFAULT_DIGITS: u32 = 6;
pub const DEFAULT_PERIOD: u64 = 30;

/// Decoded HMAC key, parsed from base32 text.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Secret(Vec<u8>);

impl Secret {
  pub fn from_bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
    Self(bytes.into())
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

impl FromStr for Secret {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    base32::decode(s).map(Self)
  }
}

impl TryFrom<String> for Secret {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> {
    value.parse()
  }
}

/// Unpadded base32.
impl fmt::Display for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&base32::encode(&self.0))
  }
}

impl fmt::Debug for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Secret({} bytes)", self.0.len())
  }
}

/// Number of decimal digits in a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Digits(NonZeroU32);

impl Digits {
  pub fn new(digits: u32) -> Result<Self> {
    NonZeroU32::new(digits).map(Self).ok_or(Error::InvalidDigits)
  }

  pub fn get(self) -> u32 {
    self.0.get()
  }
}

impl Default for Digits {
  fn default() -> Self {
    Self(NonZeroU32::MIN.saturating_add(DEFAULT_DIGITS - 1))
  }
}

impl TryFrom<u32> for Digits {
  type Error = Error;

  fn try_from(value: u32) -> Result<Self> {
    Self::new(value)
  }
}

impl From<Digits> for u32 {
  fn from(value: Digits) -> Self {
    value.get()
  }
}

impl fmt::Display for Digits {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Length of a TOTP time step in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Period(NonZeroU64);

impl Period {
  pub fn new(seconds: u64) -> Result<Self> {
    NonZeroU64::new(seconds).map(Self).ok_or(Error::InvalidPeriod)
  }

  pub fn get(self) -> u64 {
    self.0.get()
  }
}

impl Default for Period {
  fn default() -> Self {
    Self(NonZeroU64::MIN.saturating_add(DEFAULT_PERIOD - 1))
  }
}

impl TryFrom<u64> for Period {
  type Error = Error;

  fn try_from(value: u64) -> Result<Self> {
    Self::new(value)
  }
}

impl From<Period> for u64 {
  fn from(value: Period) -> Self {
    value.get()
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}s", self.0)
  }
}

/// Counter- or time-based, with the parameter that moves the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OtpKind {
  Hotp {
    #[serde(default)]
    counter: u64,
  },
  Totp {
    #[serde(default)]
    period: Period,
  },
}

/// Everything needed to compute codes for one account, i.e. the parameter
/// set an otpauth URI carries.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Otp {
  pub secret: Secret,
  #[serde(default)]
  pub digits: Digits,
  #[serde(default)]
  pub algorithm: Algorithm,
  #[serde(flatten)]
  pub kind: OtpKind,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Code {
  pub otp: String,
  /// Seconds until a time-based code rolls over.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub remaining: Option<u64>,
}

impl Otp {
  pub fn hotp(secret: Secret, counter: u64) -> Self {
    Self { secret, digits: Digits::default(), algorithm: Algorithm::default(), kind: OtpKind::Hotp { counter } }
  }

  pub fn totp(secret: Secret, period: Period) -> Self {
    Self { secret, digits: Digits::default(), algorithm: Algorithm::default(), kind: OtpKind::Totp { period } }
  }

  pub fn with_digits(mut self, digits: Digits) -> Self {
    self.digits = digits;
    self
  }

  pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
    self.algorithm = algorithm;
    self
  }

  /// The current code. `time` only matters for TOTP, `None` means now.
  pub fn code(&self, time: Option<u64>) -> Code {
    match self.kind {
      OtpKind::Hotp { counter } => Code {
        otp: hotp::generate(&self.secret, counter, self.digits, self.algorithm),
        remaining: None,
      },
      OtpKind::Totp { period } => {
        let (otp, remaining) = totp::generate(&self.secret, time, period, self.digits, self.algorithm);
        Code { otp, remaining: Some(remaining) }
      }
    }
  }

  /// Moves an HOTP account to its next counter; TOTP accounts move with the clock.
  pub fn advance(&mut self) {
    if let OtpKind::Hotp { counter } = &mut self.kind {
      *counter = counter.saturating_add(1);
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_defaults() {
    assert_eq!(Digits::default().get(), 6);
    assert_eq!(Period::default().get(), 30);
    assert_eq!(Digits::new(0), Err(Error::InvalidDigits));
    assert_eq!(Period::new(0), Err(Error::InvalidPeriod));
  }

  #[test]
  fn test_secret() {
    let secret: Secret = "gezdgnbvgy3tqojqgezdgnbvgy3tqojq====".parse().unwrap();
    assert_eq!(secret.as_bytes(), b"12345678901234567890");
    assert_eq!(secret.to_string(), "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
    assert_eq!(format!("{:?}", secret), "Secret(20 bytes)");
    assert_eq!(Secret::from_bytes(*b"hello").to_string(), "NBSWY3DP");
    assert!("GEZD1NBV".parse::<Secret>().is_err());
  }

  #[test]
  fn test_hotp_advance() {
    let secret: Secret = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ".parse().unwrap();
    let mut otp = Otp::hotp(secret, 0);
    assert_eq!(otp.code(None), Code { otp: "755224".to_string(), remaining: None });
    otp.advance();
    assert_eq!(otp.kind, OtpKind::Hotp { counter: 1 });
    assert_eq!(otp.code(Some(12345)).otp, "287082");

    let mut otp = Otp::hotp(otp.secret, u64::MAX);
    otp.advance();
    assert_eq!(otp.kind, OtpKind::Hotp { counter: u64::MAX });
  }

  #[test]
  fn test_totp_code() {
    let secret = Secret::from_bytes(*b"12345678901234567890");
    let mut otp = Otp::totp(secret, Period::default()).with_digits(Digits::new(8).unwrap());
    assert_eq!(otp.code(Some(59)), Code { otp: "94287082".to_string(), remaining: Some(1) });
    otp.advance();
    assert_eq!(otp.code(Some(1111111109)).otp, "07081804");
  }

  #[test]
  fn test_deserialize() {
    let otp: Otp = serde_json::from_str(r#"{
      "type": "totp",
      "secret": "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ",
      "algorithm": "SHA256",
      "digits": 8,
      "period": 60
    }"#).unwrap();
    assert_eq!(otp.algorithm, Algorithm::Sha256);
    assert_eq!(otp.digits.get(), 8);
    assert_eq!(otp.kind, OtpKind::Totp { period: Period::new(60).unwrap() });

    let otp: Otp = serde_json::from_str(r#"{"type": "hotp", "secret": "NBSWY3DP"}"#).unwrap();
    assert_eq!(otp.digits, Digits::default());
    assert_eq!(otp.algorithm, Algorithm::Sha1);
    assert_eq!(otp.kind, OtpKind::Hotp { counter: 0 });

    assert!(serde_json::from_str::<Otp>(r#"{"type": "hotp", "secret": "NBSWY3DP", "algorithm": "MD5"}"#).is_err());
    assert!(serde_json::from_str::<Otp>(r#"{"type": "totp", "secret": "NBSWY3DP", "period": 0}"#).is_err());
    assert!(serde_json::from_str::<Otp>(r#"{"type": "totp", "secret": "NBSWY3DP", "digits": 0}"#).is_err());
    assert!(serde_json::from_str::<Otp>(r#"{"type": "totp", "secret": "NBSW1"}"#).is_err());
  }
}
