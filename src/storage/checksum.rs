//! Integrity checksum for the stored aggregate
//!
//! A 32-bit rolling polynomial hash (multiply by 31, add byte, wrap) over
//! the serialized `data` field. This is a corruption tripwire, not a
//! security primitive: it catches accidental truncation or bit rot, nothing
//! adversarial.

/// Compute the 32-bit rolling checksum of a byte slice
pub fn checksum32(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |hash, &b| hash.wrapping_mul(31).wrapping_add(b as u32))
}

/// Checksum rendered as lowercase hex, without zero padding
pub fn checksum_hex(bytes: &[u8]) -> String {
    format!("{:x}", checksum32(bytes))
}

/// Verify a byte slice against a stored hex digest
pub fn verify(bytes: &[u8], expected: &str) -> bool {
    checksum_hex(bytes).eq_ignore_ascii_case(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(checksum32(b""), 0);
        assert_eq!(checksum_hex(b""), "0");
    }

    #[test]
    fn test_known_value() {
        // "a" = 97; "ab" = 97*31 + 98 = 3105
        assert_eq!(checksum32(b"a"), 97);
        assert_eq!(checksum32(b"ab"), 3105);
        assert_eq!(checksum_hex(b"ab"), "c21");
    }

    #[test]
    fn test_single_byte_sensitivity() {
        let a = checksum32(br#"{"accounts":[{"name":"Cash"}]}"#);
        let b = checksum32(br#"{"accounts":[{"name":"Dash"}]}"#);
        assert_ne!(a, b);
    }

    #[test]
    fn test_wraparound_does_not_panic() {
        let big = vec![0xffu8; 4096];
        let _ = checksum32(&big);
    }

    #[test]
    fn test_verify() {
        let bytes = b"payload";
        let digest = checksum_hex(bytes);
        assert!(verify(bytes, &digest));
        assert!(verify(bytes, &digest.to_uppercase()));
        assert!(!verify(b"payloaX", &digest));
    }
}
