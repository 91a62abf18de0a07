//! Signed-transaction (PSBT) file decoding.
//!
//! Transaction files reach us in two shapes:
//! - binary PSBT, as written by Electrum desktop
//! - a text file holding base64 PSBT, as written by Coldcard
//!
//! The platform reader always hands us the base64 rendition of the file, so
//! the second shape arrives base64-encoded twice. Decoding one layer and
//! looking for the `psbt` magic tells the two apart.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::FsError;

/// Leading bytes of every serialized PSBT (`psbt` followed by 0xff)
pub const PSBT_MAGIC: &[u8] = b"psbt";

/// Base64 text of a serialized PSBT, as the wallet screens expect it
pub type TransactionPayload = String;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64 the forgiving way platform readers do: characters outside
/// the alphabet are skipped and an incomplete trailing sextet is dropped.
fn lenient_decode(text: &str) -> Vec<u8> {
    let mut cleaned: Vec<u8> = text
        .bytes()
        .take_while(|b| *b != b'=')
        .filter(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
        .collect();

    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }

    LENIENT.decode(&cleaned).unwrap_or_default()
}

/// Turn the base64 rendition of a transaction file into the canonical payload.
///
/// If one layer of decoding exposes the PSBT magic, the file was binary and
/// `text_safe` is already the payload. Otherwise the file was text holding
/// base64 PSBT and the once-decoded text is the payload. Garbage in yields
/// garbage out; see [`decode_strict`] for a validating variant.
pub fn decode(text_safe: &str) -> TransactionPayload {
    let candidate = String::from_utf8_lossy(&lenient_decode(text_safe)).into_owned();

    if candidate.as_bytes().starts_with(PSBT_MAGIC) {
        tracing::debug!("Transaction file is binary PSBT");
        text_safe.to_string()
    } else {
        tracing::debug!("Transaction file is text, using once-decoded content");
        candidate
    }
}

/// Like [`decode`], but the result must itself decode to PSBT bytes.
pub fn decode_strict(text_safe: &str) -> Result<TransactionPayload, FsError> {
    let candidate = lenient_decode(text_safe);
    if candidate.starts_with(PSBT_MAGIC) {
        return Ok(text_safe.to_string());
    }

    let payload = String::from_utf8_lossy(&candidate).trim().to_string();
    match BASE64.decode(payload.as_bytes()) {
        Ok(bytes) if bytes.starts_with(PSBT_MAGIC) => Ok(payload),
        _ => Err(FsError::InvalidTransactionFile),
    }
}

/// Decode the raw bytes of a picked transaction file
pub fn read_transaction_file(raw: &[u8], strict: bool) -> Result<TransactionPayload, FsError> {
    let text_safe = BASE64.encode(raw);
    if strict {
        decode_strict(&text_safe)
    } else {
        Ok(decode(&text_safe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_psbt() -> Vec<u8> {
        let mut bytes = b"psbt\xff\x01\x00".to_vec();
        bytes.extend((0u8..=200).map(|b| b.wrapping_mul(7)));
        bytes
    }

    #[test]
    fn test_binary_file_passes_through() {
        let encoded = BASE64.encode(binary_psbt());
        assert_eq!(decode(&encoded), encoded);
    }

    #[test]
    fn test_text_file_returns_once_decoded() {
        let payload = BASE64.encode(binary_psbt());
        assert!(payload.starts_with("cHNidP8B"));

        let double = BASE64.encode(payload.as_bytes());
        assert_eq!(decode(&double), payload);
    }

    #[test]
    fn test_non_marker_content_returns_candidate() {
        let double = BASE64.encode("hello wallet");
        assert_eq!(decode(&double), "hello wallet");
    }

    #[test]
    fn test_marker_only_needs_ascii_prefix() {
        let encoded = BASE64.encode(b"psbt");
        assert_eq!(decode(&encoded), encoded);
    }

    #[test]
    fn test_malformed_base64_falls_through() {
        // "aGk" is unpadded "hi"; the junk characters are skipped
        assert_eq!(decode("aG!k"), "hi");
        assert_eq!(decode(""), "");
        assert_eq!(decode("a"), "");
    }

    #[test]
    fn test_text_file_with_trailing_newline_is_kept_permissive() {
        let payload = BASE64.encode(binary_psbt());
        let file = format!("{}\n", payload);
        let result = read_transaction_file(file.as_bytes(), false).unwrap();
        assert_eq!(result, file);
    }

    #[test]
    fn test_read_transaction_file_binary() {
        let raw = binary_psbt();
        let result = read_transaction_file(&raw, false).unwrap();
        assert_eq!(result, BASE64.encode(&raw));
    }

    #[test]
    fn test_strict_accepts_both_shapes() {
        let raw = binary_psbt();
        let payload = BASE64.encode(&raw);

        assert_eq!(read_transaction_file(&raw, true).unwrap(), payload);

        let file = format!("{}\r\n", payload);
        assert_eq!(read_transaction_file(file.as_bytes(), true).unwrap(), payload);
    }

    #[test]
    fn test_strict_rejects_unrelated_text() {
        let result = read_transaction_file(b"not a transaction", true);
        assert!(matches!(result, Err(FsError::InvalidTransactionFile)));

        let other = BASE64.encode(b"\x00\x01binary but not psbt");
        let result = read_transaction_file(other.as_bytes(), true);
        assert!(matches!(result, Err(FsError::InvalidTransactionFile)));

        assert!(read_transaction_file(b"", true).is_err());
    }

    #[test]
    fn test_decode_matches_single_decode_for_any_text() {
        for text in ["", "abc", "wallet backup v1", "{\"json\":true}", "psb", "PSBT upper"] {
            let encoded = BASE64.encode(text);
            assert_eq!(decode(&encoded), text, "input {:?}", text);
        }
    }
}
