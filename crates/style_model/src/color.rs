//! Ink and paper colors

use crate::{Result, StyleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An 8-bit RGBA color, serialized as a `#rrggbb` / `#rrggbbaa` hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Off-white default paper (`#FFFEF5`)
    pub const PAPER: Color = Color::rgb(0xff, 0xfe, 0xf5);
    /// Parchment tone for vintage paper (`#f0e6d2`)
    pub const PARCHMENT: Color = Color::rgb(0xf0, 0xe6, 0xd2);
    /// Default margin rule (`#f87171`)
    pub const MARGIN_RED: Color = Color::rgb(0xf8, 0x71, 0x71);
    /// Ruled line blue (`#d4e5f7`)
    pub const RULE_BLUE: Color = Color::rgb(0xd4, 0xe5, 0xf7);
    /// Grid line gray (`#e0e0e0`)
    pub const GRID_GRAY: Color = Color::rgb(0xe0, 0xe0, 0xe0);
    /// Question number accent (`#ef4444`)
    pub const ACCENT_RED: Color = Color::rgb(0xef, 0x44, 0x44);
    /// Question body slate (`#334155`)
    pub const SLATE: Color = Color::rgb(0x33, 0x41, 0x55);
    /// Page header gray (`#64748b`)
    pub const HEADER_GRAY: Color = Color::rgb(0x64, 0x74, 0x8b);
    /// Pen color for hand-drawn underlines (`#1a1a1a`)
    pub const PEN: Color = Color::rgb(0x1a, 0x1a, 0x1a);
    /// Pencil gray for sketches (`#666666`)
    pub const PENCIL: Color = Color::rgb(0x66, 0x66, 0x66);

    /// Parse a CSS-style hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || StyleError::InvalidColor(hex.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => Ok(Self::rgba(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Lighten every color channel by `amount`, saturating at white
    pub fn lighten(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
            a: self.a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(Color::from_hex("#FFFEF5").unwrap(), Color::PAPER);
        assert_eq!(Color::from_hex("f0e6d2").unwrap(), Color::PARCHMENT);
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Color::from_hex("#000").unwrap(), Color::BLACK);
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
    }

    #[test]
    fn test_parse_with_alpha() {
        let c = Color::from_hex("#11223380").unwrap();
        assert_eq!(c, Color::rgba(0x11, 0x22, 0x33, 0x80));
        assert_eq!(c.to_string(), "#11223380");
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_lighten_saturates() {
        let c = Color::rgb(250, 10, 0).lighten(20);
        assert_eq!(c, Color::rgb(255, 30, 20));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::ACCENT_RED).unwrap();
        assert_eq!(json, "\"#ef4444\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::ACCENT_RED);
    }
}
