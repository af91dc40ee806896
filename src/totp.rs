//! Time-based one-time passwords (RFC 6238): HOTP over `unix time / period`.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
  algorithm::Algorithm,
  hotp,
  params::{Digits, Period, Secret},
};

/// Seconds since the unix epoch, 0 if the clock is set before it.
pub fn now() -> u64 {
  match SystemTime::now().duration_since(UNIX_EPOCH) {
    Ok(n) => n.as_secs(),
    Err(e) => {
      warn!("system clock is before the unix epoch: {}", e);
      0
    }
  }
}

pub fn counter_at(time: u64, period: Period) -> u64 {
  time / period.get()
}

/// Seconds left in the window containing `time`, in `1..=period`.
pub fn remaining_at(time: u64, period: Period) -> u64 {
  period.get() - time % period.get()
}

/// The code for `time` (now if `None`) and how long it stays valid.
pub fn generate(secret: &Secret, time: Option<u64>, period: Period, digits: Digits, algorithm: Algorithm) -> (String, u64) {
  let time = time.unwrap_or_else(now);
  let counter = counter_at(time, period);
  debug!("totp time={} period={} counter={}", time, period, counter);
  (hotp::generate(secret, counter, digits, algorithm), remaining_at(time, period))
}
