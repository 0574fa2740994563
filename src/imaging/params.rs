//! Parameter types for card rendering.
//!
//! These types describe *what* the encoder should produce, not *how*. They
//! sit between the [`scene`](super::scene) composer and the
//! [`backend`](super::backend) that does the pixel work.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy quality for the quantization step (1–100, default 90). Clamped on construction.
//! - [`PaletteSize`]: Maximum palette entries after quantization (2–256, default 128).
//! - [`Rgba`]: An 8-bit straight-alpha color, parsed from `#rgb` / `#rrggbb` hex strings.

use std::fmt;

/// Quality setting for the lossy quantization step (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Number of low bits dropped from each channel before colors are
    /// histogrammed. Quality 90 drops one bit; 100 keeps full precision.
    pub fn precision_shift(self) -> u32 {
        ((100 - self.0) / 10).min(4)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Upper bound on the number of palette colors in an encoded card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteSize(usize);

impl PaletteSize {
    pub fn new(value: usize) -> Self {
        Self(value.clamp(2, 256))
    }

    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for PaletteSize {
    fn default() -> Self {
        Self(128)
    }
}

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::opaque(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                // #abc expands to #aabbcc
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self::opaque(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => None,
        }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
