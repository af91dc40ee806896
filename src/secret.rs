use rand::{distributions::Alphanumeric, Rng};

use crate::base32;

pub const DEFAULT_LENGTH: usize = 20;

/// A fresh base32 secret: `length` random characters from `[A-Za-z0-9]`,
/// encoded as text rather than used as raw key bytes.
pub fn generate(length: usize) -> String {
  generate_with(&mut rand::thread_rng(), length)
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
  let characters = rng.sample_iter(&Alphanumeric).take(length).collect::<Vec<u8>>();
  debug!("generated a {} character secret", characters.len());
  base32::encode(&characters)
}

#[cfg(test)]
mod test {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;

  #[test]
  fn test_generate() {
    assert_eq!(generate(0), "");
    for length in [1, 5, 16, DEFAULT_LENGTH, 33] {
      let secret = generate(length);
      assert_eq!(secret.len(), (length * 8 + 4) / 5);
      assert!(!secret.contains('='));
      let characters = base32::decode(&secret).unwrap();
      assert_eq!(characters.len(), length);
      assert!(characters.iter().all(u8::is_ascii_alphanumeric));
    }
  }

  #[test]
  fn test_seeded() {
    let a = generate_with(&mut StdRng::seed_from_u64(56), 20);
    let b = generate_with(&mut StdRng::seed_from_u64(56), 20);
    let c = generate_with(&mut StdRng::seed_from_u64(57), 20);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(generate(DEFAULT_LENGTH), generate(DEFAULT_LENGTH));
  }
}
