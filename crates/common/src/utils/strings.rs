use eyre::{bail, Result};
use std::fmt::Write;

/// Decodes a hex string into a vector of bytes
///
/// Decoding is case-insensitive. Leading and trailing whitespace and an optional `0x` prefix are
/// ignored.
///
/// ```
/// use evmaot_common::utils::strings::decode_hex;
///
/// let hex = "48656c6c6f20576f726c64"; // "Hello World" in hex
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]);
/// ```
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    // normalize
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

    if s.is_empty() {
        return Ok(vec![]);
    }
    if !s.is_ascii() {
        bail!("invalid hex string: contains non-ascii characters");
    }
    if s.len() % 2 != 0 {
        bail!("invalid hex string: odd number of digits ({})", s.len());
    }

    s.as_bytes()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match (hex_digit(pair[0]), hex_digit(pair[1])) {
            (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
            _ => bail!("invalid hex string: bad digit at offset {}", i * 2),
        })
        .collect()
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Encodes a slice of bytes into a lowercase hex string
///
/// ```
/// use evmaot_common::utils::strings::encode_hex;
///
/// let bytes = vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100];
/// let result = encode_hex(&bytes);
/// assert_eq!(result, "48656c6c6f20576f726c64");
/// ```
pub fn encode_hex(s: &[u8]) -> String {
    s.iter().fold(String::with_capacity(s.len() * 2), |mut acc, b| {
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
