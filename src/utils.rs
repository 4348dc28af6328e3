//! Helpers for rendering bit and word values read from the PLC.
//!
//! Bit devices come back as `Vec<bool>` in address order.
//!
//! # Example
//!
//! ```
//! use melsec_mc1e::utils::{format_bits, format_words, toggle_bits};
//!
//! let bits = [true, false, true, false];
//! assert_eq!(format_bits(&toggle_bits(&bits)), "0101");
//! assert_eq!(format_words(&[26, 0xFFFF]), "0x001A 0xFFFF");
//! ```

/// Renders bits in address order as `'1'`/`'0'` characters.
///
/// # Example
///
/// ```
/// use melsec_mc1e::utils::format_bits;
///
/// assert_eq!(format_bits(&[true, false, false, true]), "1001");
/// ```
pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Inverts every bit.
pub fn toggle_bits(bits: &[bool]) -> Vec<bool> {
    bits.iter().map(|&b| !b).collect()
}

/// Formats a word as hexadecimal.
///
/// # Example
///
/// ```
/// use melsec_mc1e::utils::format_hex;
///
/// assert_eq!(format_hex(26), "0x001A");
/// ```
pub fn format_hex(value: u16) -> String {
    format!("0x{:04X}", value)
}

/// Formats words as a space-separated list of `0xNNNN` values.
pub fn format_words(values: &[u16]) -> String {
    values
        .iter()
        .map(|&v| format_hex(v))
        .collect::<Vec<_>>()
        .join(" ")
}
