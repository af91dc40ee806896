use std::{fmt, str::FromStr};

use crate::error::Error;

/// Keyed-hash primitive behind a code, named as in otpauth URIs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Algorithm {
  #[default]
  Sha1,
  Sha256,
  Sha512,
}

impl Algorithm {
  pub const ALL: [Algorithm; 3] = [Algorithm::Sha1, Algorithm::Sha256, Algorithm::Sha512];

  pub fn name(self) -> &'static str {
    match self {
      Algorithm::Sha1 => "SHA1",
      Algorithm::Sha256 => "SHA256",
      Algorithm::Sha512 => "SHA512",
    }
  }

  /// Digest length in bytes.
  pub fn output_len(self) -> usize {
    match self {
      Algorithm::Sha1 => 20,
      Algorithm::Sha256 => 32,
      Algorithm::Sha512 => 64,
    }
  }
}

impl FromStr for Algorithm {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Algorithm::ALL
      .into_iter()
      .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s))
      .ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
  }
}

impl TryFrom<String> for Algorithm {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl fmt::Display for Algorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
