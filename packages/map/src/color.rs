//! Marker color scale.
//!
//! Markers are colored on a continuous logarithmic ramp so that a handful
//! of very busy locations does not wash every other marker out to the low
//! end. The weight of a group with `count` cars, when the busiest group has
//! `max` cars, is `ln(1 + count) / ln(1 + max)`; the color is the linear
//! RGB interpolation between the scale's `low` and `high` colors at that
//! weight.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel =
            |a: u8, b: u8| (f64::from(b) - f64::from(a)).mul_add(t, f64::from(a)).round() as u8;
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a string is not a `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}': expected #rrggbb")]
pub struct InvalidColorError(pub String);

impl FromStr for Rgb {
    type Err = InvalidColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = InvalidColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Continuous logarithmic color scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScale {
    /// Color of the quietest locations.
    pub low: Rgb,
    /// Color of the busiest location.
    pub high: Rgb,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            low: Rgb::new(0xff, 0xff, 0xb2),
            high: Rgb::new(0xbd, 0x00, 0x26),
        }
    }
}

impl ColorScale {
    /// Weight in `[0, 1]` of a group with `count` members when the largest
    /// group has `max`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn weight(count: usize, max: usize) -> f64 {
        if max == 0 {
            return 0.0;
        }
        let count = count.min(max) as f64;
        (count.ln_1p() / (max as f64).ln_1p()).clamp(0.0, 1.0)
    }

    /// Color of a group with `count` members when the largest group has
    /// `max`.
    #[must_use]
    pub fn color(&self, count: usize, max: usize) -> Rgb {
        self.low.lerp(self.high, Self::weight(count, max))
    }
}
