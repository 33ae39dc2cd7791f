//! Note colors.
//!
//! Notes store a plain 8-bit RGB triple with implicit full opacity. The
//! persisted form is `#RRGGBB`; [`Hsb`] is the hue/saturation/brightness
//! view used when picking a color.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected six hex digits after '#'")]
    InvalidHex,
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn is_white(&self) -> bool {
        *self == Self::WHITE
    }

    /// Build a color from floating point components in `[0, 1]`.
    ///
    /// Out-of-range components are clamped.
    pub fn from_components(red: f64, green: f64, blue: f64) -> Self {
        Self::new(
            component_to_u8(red),
            component_to_u8(green),
            component_to_u8(blue),
        )
    }

    /// Channels scaled to `[0, 1]`.
    pub fn components(&self) -> (f64, f64, f64) {
        (
            f64::from(self.red) / 255.0,
            f64::from(self.green) / 255.0,
            f64::from(self.blue) / 255.0,
        )
    }

    /// Format as `#RRGGBB` with uppercase digits.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Parse `#RRGGBB`, case-insensitive.
    ///
    /// Only the leading `#` and the first six digits are checked; anything
    /// after them is ignored.
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        use ColorParseError::*;

        let digits = value.strip_prefix('#').ok_or(MissingHash)?.as_bytes();
        if digits.len() < 6 {
            return Err(InvalidHex);
        }

        let channel = |at: usize| -> Result<u8, ColorParseError> {
            let hi = nibble(digits[at]).ok_or(InvalidHex)?;
            let lo = nibble(digits[at + 1]).ok_or(InvalidHex)?;
            Ok(hi << 4 | lo)
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn component_to_u8(component: f64) -> u8 {
    // NaN saturates to 0
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// A color in hue/saturation/brightness space, every component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

impl Hsb {
    pub fn new(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue: hue.clamp(0.0, 1.0),
            saturation: saturation.clamp(0.0, 1.0),
            brightness: brightness.clamp(0.0, 1.0),
        }
    }

    pub fn with_hue_and_saturation(&self, hue: f64, saturation: f64) -> Self {
        Self::new(hue, saturation, self.brightness)
    }

    pub fn with_brightness(&self, brightness: f64) -> Self {
        Self::new(self.hue, self.saturation, brightness)
    }

    /// RGB components in `[0, 1]`.
    pub fn rgb_components(&self) -> (f64, f64, f64) {
        let Hsb {
            hue,
            saturation,
            brightness,
        } = *self;

        let sector = (hue * 6.0) as u32;
        let f = hue * 6.0 - f64::from(sector);
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - f * saturation);
        let t = brightness * (1.0 - (1.0 - f) * saturation);

        match sector % 6 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        }
    }

    pub fn to_rgb(&self) -> Rgb {
        let (red, green, blue) = self.rgb_components();
        Rgb::from_components(red, green, blue)
    }
}

impl From<Rgb> for Hsb {
    fn from(color: Rgb) -> Self {
        let (r, g, b) = color.components();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let saturation = if max > 0.0 { chroma / max } else { 0.0 };

        let hue = if chroma == 0.0 {
            0.0
        } else if max == r {
            let h = (g - b) / chroma / 6.0;
            if h < 0.0 {
                h + 1.0
            } else {
                h
            }
        } else if max == g {
            ((b - r) / chroma + 2.0) / 6.0
        } else {
            ((r - g) / chroma + 4.0) / 6.0
        };

        Self::new(hue, saturation, max)
    }
}

impl From<Hsb> for Rgb {
    fn from(color: Hsb) -> Self {
        color.to_rgb()
    }
}
