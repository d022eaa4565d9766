//! Colour type and hex parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{TiledError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque white, the identity for channel scaling.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour literal.
    ///
    /// Accepted forms are `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA`. Short
    /// forms duplicate each nibble, so `#F008` is `(255, 0, 0, 0x88)`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some(hex) = s.strip_prefix('#') else {
            return Err(invalid(s));
        };
        if !hex.is_ascii() {
            return Err(invalid(s));
        }

        let channels: Vec<u8> = match hex.len() {
            3 | 4 => hex
                .chars()
                .map(|c| parse_nibble(c).map(|n| n << 4 | n))
                .collect::<Result<_>>()?,
            6 | 8 => (0..hex.len())
                .step_by(2)
                .map(|i| parse_byte(&hex[i..i + 2]))
                .collect::<Result<_>>()?,
            _ => return Err(invalid(s)),
        };

        let alpha = channels.get(3).copied().unwrap_or(255);
        Ok(Self::new(channels[0], channels[1], channels[2], alpha))
    }

    /// Convert to an RGBA byte array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Per-channel multipliers in `0.0..=1.0` used when tinting an image.
    pub fn scale_factors(self) -> [f32; 4] {
        self.to_rgba().map(|c| f32::from(c) / 255.0)
    }
}

impl FromStr for Colour {
    type Err = TiledError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

fn invalid(s: &str) -> TiledError {
    TiledError::Parse {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RGB, #RGBA, #RRGGBB, or #RRGGBBAA format".to_string()),
    }
}

fn parse_nibble(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| TiledError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

fn parse_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| TiledError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}
