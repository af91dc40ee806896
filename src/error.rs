/// Input-validation failures of the OTP engine.
///
/// None of these are retryable: they all mean the caller handed over a
/// parameter outside the domain of the otpauth vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  #[error("invalid base32 character {character:?} at position {position}")]
  InvalidEncoding { character: char, position: usize },
  #[error("unsupported algorithm: {0:?}")]
  UnsupportedAlgorithm(String),
  #[error("period must be a positive number of seconds")]
  InvalidPeriod,
  #[error("digits must be a positive number")]
  InvalidDigits,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
