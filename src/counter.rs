/// The HOTP message: the moving factor as 8 big-endian bytes (RFC 4226 §5.3).
pub fn encode(counter: u64) -> [u8; 8] {
  counter.to_be_bytes()
}

#[test]
fn test_encode() {
  assert_eq!(encode(0), [0; 8]);
  assert_eq!(encode(1), [0, 0, 0, 0, 0, 0, 0, 1]);
  assert_eq!(encode(0x0102_0304_0506_0708), [1, 2, 3, 4, 5, 6, 7, 8]);
  assert_eq!(encode(u64::MAX), [0xff; 8]);
  // 1111111111 / 30 from the RFC 6238 test table
  assert_eq!(encode(0x023523EC), [0, 0, 0, 0, 0x02, 0x35, 0x23, 0xEC]);
}
