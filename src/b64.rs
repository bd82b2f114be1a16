use base64::alphabet;
use base64::engine::general_purpose::{
    GeneralPurpose, GeneralPurposeConfig, STANDARD as b64_std, STANDARD_NO_PAD as b64_stdnopad,
};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine};

// Padding is stripped before decoding, and some producers leave stray bits in the final
// symbol, so neither is enforced.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Decodes any base64 dialect found in stored hash strings: standard, padded or not, the
/// MCF flavour that writes `.` for `+`, and the URL-safe alphabet.
pub fn decode(token: &str) -> Result<Vec<u8>, DecodeError> {
    let normalized: String = token
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '.' | '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    LENIENT.decode(normalized)
}

/// Unpadded standard base64, as written by the argon2 utility and PHC strings
pub fn encode(bytes: &[u8]) -> String {
    b64_stdnopad.encode(bytes)
}

/// Padded standard base64, as Django stores its digests
pub fn encode_padded(bytes: &[u8]) -> String {
    b64_std.encode(bytes)
}

/// Unpadded base64 with `.` in place of `+` (passlib's "adapted base64")
pub fn encode_adapted(bytes: &[u8]) -> String {
    b64_stdnopad.encode(bytes).replace('+', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BYTES: [u8; 5] = [251, 239, 190, 255, 255];

    #[test]
    fn test_decode_dialects() {
        for token in ["++++//8=", "++++//8", "....//8", "----__8", "++++//8=====", "-.+-_/8"] {
            assert_eq!(decode(token).unwrap(), BYTES, "token {token}");
        }
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        assert!(decode("++++//8!").is_err());
        assert!(decode("AQID BAU").is_err());
        assert!(decode("AQ=ID").is_err());
        assert!(decode("A").is_err());
    }

    #[test]
    fn test_decode_tolerates_trailing_bits() {
        // "AR" and "AQ" both carry the single byte 0x01; "AR" has a stray low bit.
        assert_eq!(decode("AR").unwrap(), vec![1]);
        assert_eq!(decode("AQ").unwrap(), vec![1]);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("==").unwrap().is_empty());
    }

    #[test]
    fn test_encoders() {
        assert_eq!(encode(&BYTES), "++++//8");
        assert_eq!(encode_padded(&BYTES), "++++//8=");
        assert_eq!(encode_adapted(&BYTES), "....//8");
    }
}
