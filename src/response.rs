//! 1E ASCII response parsing and payload decoding.
//!
//! # Response Structure
//!
//! | Offset | Width | Field | Description |
//! |-------:|------:|-------|-------------|
//! | 0 | 2 | Subheader | Request command with bit 7 set (`80`..`83`) |
//! | 2 | 2 | End code | `00` = success |
//! | 4 | .. | Payload | Bit chars or 4-hex-digit words (reads only) |
//!
//! A response with any end code other than `00` is a failure and its payload
//! is never handed to callers.
//!
//! # Example
//!
//! ```
//! use melsec_mc1e::{decode_bits, McResponse};
//!
//! let response = McResponse::parse("800000000000").unwrap();
//! assert_eq!(response.end_code, "00");
//!
//! let bits = decode_bits(&response.payload, 8).unwrap();
//! assert_eq!(bits, vec![false; 8]);
//! ```

use crate::device::DeviceUnit;
use crate::error::{McError, Result};
use crate::header::RESPONSE_HEADER_LEN;

/// End code reported on success.
pub const END_CODE_OK: &str = "00";

/// Parsed 1E response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McResponse {
    /// Subheader characters.
    pub subheader: String,
    /// End code characters (always `"00"` on a parsed response).
    pub end_code: String,
    /// Data following the end code.
    pub payload: String,
}

impl McResponse {
    /// Parses a response and validates its end code.
    ///
    /// # Errors
    ///
    /// - `McError::MalformedResponse` if `raw` is shorter than 4 characters
    /// - `McError::ProtocolError` if the end code is not `"00"`
    ///
    /// # Example
    ///
    /// ```
    /// use melsec_mc1e::{McError, McResponse};
    ///
    /// assert!(McResponse::parse("8300").is_ok());
    /// assert!(matches!(McResponse::parse("8305"), Err(McError::ProtocolError { .. })));
    /// assert!(matches!(McResponse::parse("830"), Err(McError::MalformedResponse { .. })));
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() < RESPONSE_HEADER_LEN {
            return Err(McError::malformed_response(raw));
        }

        let (subheader, end_code, payload) = match (
            raw.get(..2),
            raw.get(2..RESPONSE_HEADER_LEN),
            raw.get(RESPONSE_HEADER_LEN..),
        ) {
            (Some(s), Some(e), Some(p)) => (s, e, p),
            _ => return Err(McError::malformed_response(raw)),
        };

        if end_code != END_CODE_OK {
            return Err(McError::protocol_error(end_code, raw));
        }

        Ok(Self {
            subheader: subheader.to_string(),
            end_code: end_code.to_string(),
            payload: payload.to_string(),
        })
    }
}

/// Decodes `count` bit points from a payload of `'0'`/`'1'` characters.
///
/// Any character other than `'1'` decodes as OFF.
///
/// # Errors
///
/// Returns `McError::InsufficientPayload` if fewer than `count` characters
/// are present.
pub fn decode_bits(payload: &str, count: usize) -> Result<Vec<bool>> {
    if payload.len() < count {
        return Err(McError::insufficient_payload(count, payload));
    }

    Ok(payload.bytes().take(count).map(|c| c == b'1').collect())
}

/// Decodes `count` words from a payload of 4-hex-character chunks.
///
/// # Errors
///
/// - `McError::InvalidParameter` if `count * 4` overflows `usize`
/// - `McError::InsufficientPayload` if fewer than `count * 4` characters are present
/// - `McError::MalformedResponse` if a chunk is not hexadecimal
pub fn decode_words(payload: &str, count: usize) -> Result<Vec<u16>> {
    let width = DeviceUnit::Word.chars_per_point();
    let expected = count
        .checked_mul(width)
        .ok_or_else(|| McError::invalid_parameter("count", format!("{count} words overflow")))?;
    if payload.len() < expected {
        return Err(McError::insufficient_payload(expected, payload));
    }

    payload.as_bytes()[..expected]
        .chunks_exact(width)
        .map(|chunk| {
            // from_str_radix would accept a leading '+'
            if !chunk.iter().all(u8::is_ascii_hexdigit) {
                return Err(McError::malformed_response(payload));
            }
            std::str::from_utf8(chunk)
                .ok()
                .and_then(|text| u16::from_str_radix(text, 16).ok())
                .ok_or_else(|| McError::malformed_response(payload))
        })
        .collect()
}
