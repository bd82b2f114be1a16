use crate::error::PwHashError;

use argon2::{Argon2, Version};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Computes an Argon2id (version 0x13) digest of `out_len` bytes.
pub fn argon2id(
    password: &[u8],
    salt: &[u8],
    mem_cost_kib: u32,
    iterations: u32,
    threads: u32,
    out_len: usize,
) -> Result<Vec<u8>, PwHashError> {
    let params = argon2::Params::new(mem_cost_kib, iterations, threads, None)
        .map_err(|e| PwHashError::KdfError(e.to_string()))?;
    let ctx = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let mut out = vec![0u8; out_len];
    ctx.hash_password_into(password, salt, &mut out)
        .map_err(|e| PwHashError::KdfError(e.to_string()))?;

    Ok(out)
}

/// Computes a PBKDF2-HMAC-SHA256 digest of `out_len` bytes.
pub fn pbkdf2_sha256(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    out_len: usize,
) -> Result<Vec<u8>, PwHashError> {
    if iterations == 0 {
        return Err(PwHashError::InvalidParameter(
            "PBKDF2 iteration count must be positive",
        ));
    }

    let mut out = vec![0u8; out_len];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);

    Ok(out)
}

/// Compares a stored digest with a recomputed one in constant time. Lengths are not secret
/// and may short-circuit; an empty stored digest never matches.
pub fn digests_match(stored: &[u8], computed: &[u8]) -> bool {
    if stored.is_empty() || stored.len() != computed.len() {
        return false;
    }

    stored.ct_eq(computed).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pbkdf2_sha256_known_answer() {
        // RFC 7914 section 11
        let out = pbkdf2_sha256(b"passwd", b"salt", 1, 64).unwrap();
        assert_eq!(
            out[..16],
            [
                0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
                0xb6, 0x05
            ]
        );
        assert_eq!(out.len(), 64);
    }

    #[test]
    fn test_pbkdf2_sha256_output_length_follows_request() {
        let long = pbkdf2_sha256(b"password", b"salt", 2, 40).unwrap();
        let short = pbkdf2_sha256(b"password", b"salt", 2, 20).unwrap();
        assert_eq!(long.len(), 40);
        assert_eq!(long[..20], short[..]);
    }

    #[test]
    fn test_pbkdf2_sha256_zero_iterations() {
        assert!(matches!(
            pbkdf2_sha256(b"password", b"salt", 0, 32),
            Err(PwHashError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_argon2id_deterministic() {
        let a = argon2id(b"password", b"somesaltsomesalt", 64, 1, 1, 24).unwrap();
        let b = argon2id(b"password", b"somesaltsomesalt", 64, 1, 1, 24).unwrap();
        let c = argon2id(b"passworD", b"somesaltsomesalt", 64, 1, 1, 24).unwrap();
        assert_eq!(a.len(), 24);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_argon2id_rejects_invalid_parameters() {
        assert!(matches!(
            argon2id(b"password", b"somesaltsomesalt", 64, 0, 1, 32),
            Err(PwHashError::KdfError(_))
        ));
        assert!(matches!(
            argon2id(b"password", b"somesaltsomesalt", 64, 1, 0, 32),
            Err(PwHashError::KdfError(_))
        ));
        assert!(matches!(
            argon2id(b"password", b"short", 64, 1, 1, 32),
            Err(PwHashError::KdfError(_))
        ));
        assert!(matches!(
            argon2id(b"password", b"somesaltsomesalt", 64, 1, 1, 2),
            Err(PwHashError::KdfError(_))
        ));
    }

    #[test]
    fn test_digests_match() {
        assert!(digests_match(&[1, 2, 3], &[1, 2, 3]));
        assert!(!digests_match(&[1, 2, 3], &[1, 2, 4]));
        assert!(!digests_match(&[1, 2, 3], &[1, 2]));
        assert!(!digests_match(&[], &[]));
    }
}
