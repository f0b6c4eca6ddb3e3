//! Canonical color naming: `(r, g, b)` triples to lowercase `#rrggbb` strings
//! and back. Equality between colors is exact string equality — no tolerance,
//! so anti-aliased edges produce distinct colors.

use image::Rgb;

use crate::error::{OncoplotError, Result};

/// Render an RGB pixel as its canonical lowercase hex name.
pub fn hex_from_rgb(px: &Rgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", px[0], px[1], px[2])
}

/// Parse a `#rrggbb` (or bare `rrggbb`) string back into its channel triple.
pub fn rgb_from_hex(hex: &str) -> Result<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(OncoplotError::InvalidHex(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| OncoplotError::InvalidHex(hex.to_string()))
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Pack a hex color into the `0x00rrggbb` form the spreadsheet writer expects.
pub fn hex_to_u32(hex: &str) -> Result<u32> {
    let [r, g, b] = rgb_from_hex(hex)?;
    Ok(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
}
