//! RFC 2047 header decoding.
//!
//! Subjects arrive as possibly-encoded words
//! (`=?charset?encoding?text?=`, Base64 or Quoted-Printable). Decoding
//! here is lossy by design: anything that fails to decode falls back
//! to its raw form so a malformed header never aborts a scan.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Errors from decoding a single encoded word.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Token is not in `=?charset?encoding?text?=` form.
    #[error("not an RFC 2047 encoded word")]
    Malformed,

    /// Unknown content-transfer encoding letter.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Base64 payload failed to decode.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Quoted-Printable payload contained an invalid escape.
    #[error("invalid quoted-printable escape")]
    QuotedPrintable,
}

/// Decodes a header value, resolving any RFC 2047 encoded words.
///
/// Plain text passes through unchanged. Whitespace between two
/// adjacent encoded words is dropped, per the RFC. A word that fails
/// to decode is kept in its raw form.
#[must_use]
pub fn decode_header_value(value: &str) -> String {
    let mut result = String::new();
    let mut pending_space = "";
    let mut previous_was_encoded = false;

    for word in value.split_ascii_whitespace() {
        match decode_encoded_word(word) {
            Ok(decoded) => {
                // Space between adjacent encoded words is not
                // significant.
                if !previous_was_encoded {
                    result.push_str(pending_space);
                }
                result.push_str(&decoded);
                previous_was_encoded = true;
            }
            Err(DecodeError::Malformed) => {
                result.push_str(pending_space);
                result.push_str(word);
                previous_was_encoded = false;
            }
            Err(_) => {
                // Keep the raw token rather than dropping the message.
                result.push_str(pending_space);
                result.push_str(word);
                previous_was_encoded = false;
            }
        }
        pending_space = " ";
    }

    result
}

/// Decodes one `=?charset?encoding?text?=` token.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] for plain text, or a specific
/// error when the token looks encoded but its payload is invalid.
pub fn decode_encoded_word(word: &str) -> Result<String, DecodeError> {
    let inner = word
        .strip_prefix("=?")
        .and_then(|w| w.strip_suffix("?="))
        .ok_or(DecodeError::Malformed)?;

    let mut parts = inner.splitn(3, '?');
    let charset = parts.next().ok_or(DecodeError::Malformed)?;
    let encoding = parts.next().ok_or(DecodeError::Malformed)?;
    let payload = parts.next().ok_or(DecodeError::Malformed)?;
    if payload.contains('?') {
        return Err(DecodeError::Malformed);
    }

    let bytes = match encoding.to_ascii_uppercase().as_str() {
        "B" => STANDARD.decode(payload)?,
        "Q" => decode_q(payload)?,
        other => return Err(DecodeError::UnknownEncoding(other.to_string())),
    };

    Ok(decode_charset(charset, &bytes))
}

/// Decodes the Q variant of Quoted-Printable (RFC 2047 §4.2), where
/// `_` stands for space.
fn decode_q(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(payload.len());
    let mut bytes = payload.bytes();

    while let Some(b) = bytes.next() {
        match b {
            b'_' => out.push(b' '),
            b'=' => {
                let hi = bytes.next().ok_or(DecodeError::QuotedPrintable)?;
                let lo = bytes.next().ok_or(DecodeError::QuotedPrintable)?;
                let hex = [hi, lo];
                let hex = std::str::from_utf8(&hex).map_err(|_| DecodeError::QuotedPrintable)?;
                let byte =
                    u8::from_str_radix(hex, 16).map_err(|_| DecodeError::QuotedPrintable)?;
                out.push(byte);
            }
            _ => out.push(b),
        }
    }

    Ok(out)
}

/// Converts decoded bytes to a string according to the declared
/// charset. Unknown charsets fall back to lossy UTF-8.
fn decode_charset(charset: &str, bytes: &[u8]) -> String {
    match charset.to_ascii_lowercase().as_str() {
        "iso-8859-1" | "latin1" | "windows-1252" => {
            // Latin-1 maps bytes to the first 256 code points.
            bytes.iter().map(|&b| char::from(b)).collect()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}
