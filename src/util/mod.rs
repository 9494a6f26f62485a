//! Utility module
//!
//! Hex helpers for the textual frame form used in logs and by the transport
//! bridge's `methodParams` field.

use crate::core::{Error, Result};

/// Formats bytes as space-separated lowercase hex pairs, e.g. `ff 55 04`
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Parses whitespace-separated hex tokens into bytes
///
/// Tokens wider than a byte keep only their low eight bits. Tokens that are not
/// hexadecimal at all are rejected.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    text.split_whitespace()
        .map(|token| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u32::from_str_radix(digits, 16)
                .map(|value| (value & 0xFF) as u8)
                .map_err(|_| Error::invalid_hex(format!("'{}' is not a hex byte", token)))
        })
        .collect()
}
