//! RFC 4648 Base32, the way authenticator apps exchange secrets.
//!
//! Decoding is lenient about case and trailing `=` padding, encoding never
//! emits padding.

use crate::error::{Error, Result};

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn symbol_value(c: char) -> Option<u8> {
  match c.to_ascii_uppercase() {
    c @ 'A'..='Z' => Some(c as u8 - b'A'),
    c @ '2'..='7' => Some(c as u8 - b'2' + 26),
    _ => None,
  }
}

/// Decode base32 text into bytes.
///
/// Bits left over after the last whole byte are dropped.
pub fn decode(text: &str) -> Result<Vec<u8>> {
  let text = text.trim_end_matches('=');
  let mut bytes = Vec::with_capacity(text.len() * 5 / 8);
  let mut buffer = 0u32;
  let mut bits = 0u32;
  for (position, character) in text.chars().enumerate() {
    let value = symbol_value(character).ok_or(Error::InvalidEncoding { character, position })?;
    buffer = (buffer << 5) | value as u32;
    bits += 5;
    if bits >= 8 {
      bits -= 8;
      bytes.push((buffer >> bits) as u8);
      buffer &= (1 << bits) - 1;
    }
  }
  Ok(bytes)
}

/// Encode bytes as unpadded base32 text.
pub fn encode(bytes: &[u8]) -> String {
  let mut text = String::with_capacity((bytes.len() * 8 + 4) / 5);
  let mut buffer = 0u32;
  let mut bits = 0u32;
  for &byte in bytes {
    buffer = (buffer << 8) | byte as u32;
    bits += 8;
    while bits >= 5 {
      bits -= 5;
      text.push(ALPHABET[(buffer >> bits) as usize & 0x1f] as char);
    }
    buffer &= (1 << bits) - 1;
  }
  if bits > 0 {
    text.push(ALPHABET[(buffer << (5 - bits)) as usize & 0x1f] as char);
  }
  text
}
