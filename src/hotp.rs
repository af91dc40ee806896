//! HMAC-based one-time passwords (RFC 4226).
//!
//! Generation is a pure function of its inputs. Keeping a counter from being
//! accepted twice is up to whoever stores it: when counters are persisted and
//! bumped across authentication attempts, the compare-and-increment for a
//! given secret has to be one serialized step, otherwise two concurrent
//! requests can both succeed with the same code.

use hmac::{digest::KeyInit, Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::{algorithm::Algorithm, counter, params::{Digits, Secret}};

fn sign<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Vec<u8> {
  // HMAC pads or hashes the key to the block size, so no length is rejected
  let mut mac = match <M as KeyInit>::new_from_slice(key) {
    Ok(mac) => mac,
    Err(_) => unreachable!("hmac accepts keys of any length"),
  };
  mac.update(message);
  mac.finalize().into_bytes().to_vec()
}

/// HMAC of the counter block under `key`, as many bytes as the hash produces.
pub fn hmac(algorithm: Algorithm, key: &[u8], counter: u64) -> Vec<u8> {
  let message = counter::encode(counter);
  match algorithm {
    Algorithm::Sha1 => sign::<Hmac<Sha1>>(key, &message),
    Algorithm::Sha256 => sign::<Hmac<Sha256>>(key, &message),
    Algorithm::Sha512 => sign::<Hmac<Sha512>>(key, &message),
  }
}

/// Dynamic truncation (RFC 4226 §5.3): 31 bits picked by the low nibble of
/// the last byte.
fn dynamic_truncation(mac: &[u8]) -> u32 {
  let offset = (mac[mac.len() - 1] & 0x0f) as usize;
  ((mac[offset] as u32 & 0x7f) << 24)
    | ((mac[offset + 1] as u32) << 16)
    | ((mac[offset + 2] as u32) << 8)
    | (mac[offset + 3] as u32)
}

/// `code mod 10^digits`, zero padded to exactly `digits` characters.
fn render(code: u32, digits: Digits) -> String {
  let width = digits.get() as usize;
  // past 10^19 the modulus no longer fits, and it couldn't shrink a 31 bit code anyway
  let value = match 10u64.checked_pow(digits.get()) {
    Some(modulus) => code as u64 % modulus,
    None => code as u64,
  };
  format!("{:0width$}", value, width = width)
}

pub fn generate(secret: &Secret, counter: u64, digits: Digits, algorithm: Algorithm) -> String {
  let mac = hmac(algorithm, secret.as_bytes(), counter);
  let code = dynamic_truncation(&mac);
  trace!("hotp {} counter={} digits={} truncated={}", algorithm, counter, digits, code);
  render(code, digits)
}
