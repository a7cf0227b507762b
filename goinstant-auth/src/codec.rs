//! Compact serialization codec.
//!
//! Token segments are URL-safe base64 without padding. Decoding is tolerant:
//! it accepts the standard or URL-safe alphabet, padded or unpadded, with
//! embedded whitespace, since operators paste secret keys in either form.

use base64::{
    alphabet,
    engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD},
    engine::DecodePaddingMode,
    Engine,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{CodecErrorKind, Error, ErrorKind};

/// URL-safe decoder that ignores non-zero bits left over in the final symbol.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Pads base64 text with `=` up to a multiple of 4 characters.
pub fn pad(text: &str) -> String {
    let mut padded = text.to_string();
    let rem = padded.len() % 4;
    if rem > 0 {
        padded.push_str(&"=".repeat(4 - rem));
    }
    padded
}

/// Encodes bytes as unpadded base64url.
pub fn encode_text(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes base64 or base64url text.
///
/// Whitespace is removed, `+` and `/` are translated to `-` and `_`, and any
/// existing padding is replaced by canonical padding before decoding.
pub fn decode_text(text: &str) -> Result<Vec<u8>, Error> {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    Ok(URL_SAFE_LENIENT.decode(pad(normalized.trim_end_matches('=')))?)
}

/// Creates the compact serialization of a value: JSON text, base64url encoded.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: ErrorKind::Codec(CodecErrorKind::Serialize),
    })?;
    Ok(encode_text(json))
}

/// Decodes the compact serialization of a value back into generic JSON.
pub fn deserialize(text: &str) -> Result<Value, Error> {
    let bytes = decode_text(text)?;
    Ok(serde_json::from_slice(&bytes)?)
}
