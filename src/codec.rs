//! Reversible encoding between query text and a shareable locator.
//!
//! Locators are URL-safe base64 of the UTF-8 bytes, without padding, so they
//! can sit in a query parameter unescaped. Decoding also accepts the standard
//! alphabet and padded input.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode(query: &str) -> String {
    URL_SAFE_NO_PAD.encode(query.as_bytes())
}

pub fn try_decode(locator: &str) -> Result<String, DecodeError> {
    let locator = locator.trim();
    let bytes = if locator.contains(['+', '/']) {
        LENIENT_STANDARD.decode(locator)?
    } else {
        LENIENT_URL_SAFE.decode(locator)?
    };
    Ok(String::from_utf8(bytes)?)
}

/// Never fails: malformed input decodes to empty text, which callers treat as
/// "nothing shared".
pub fn decode(locator: &str) -> String {
    try_decode(locator).unwrap_or_else(|err| {
        debug!(error = %err, "ignoring malformed locator");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decode_inverts_encode(query in any::<String>()) {
            prop_assert_eq!(decode(&encode(&query)), query);
        }

        #[test]
        fn locator_is_url_safe(query in any::<String>()) {
            let locator = encode(&query);
            prop_assert!(locator
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            "",
            "   \n\t",
            "SELECT COUNT(*) AS n FROM employees;",
            "SELECT 'it''s'; SELECT \"q\";\nSELECT 1;",
            "SELECT 'naïve café 日本語 🚀';",
            "-- comment\r\nDELETE FROM orders WHERE amount < 100;",
        ];
        for sample in samples {
            assert_eq!(decode(&encode(sample)), sample);
        }
    }

    #[test]
    fn test_known_value() {
        assert_eq!(encode("SELECT 1;"), "U0VMRUNUIDE7");
    }

    #[test]
    fn test_accepts_standard_padded_base64() {
        // "?>" encodes to "Pz4=" in the standard alphabet.
        assert_eq!(decode("Pz4="), "?>");
        assert_eq!(decode("Pz4"), "?>");
        // "ÿ?" encodes to "w78/" in the standard alphabet and "w78_" URL-safe.
        assert_eq!(decode("w78/"), "ÿ?");
        assert_eq!(decode("w78_"), "ÿ?");
    }

    #[test]
    fn test_malformed_decodes_to_empty() {
        assert_eq!(decode("!!!not base64!!!"), "");
        assert!(matches!(try_decode("%%%"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_invalid_utf8_decodes_to_empty() {
        let locator = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0x00]);
        assert!(matches!(try_decode(&locator), Err(DecodeError::Utf8(_))));
        assert_eq!(decode(&locator), "");
    }
}
