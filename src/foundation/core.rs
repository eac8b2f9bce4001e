use std::{fmt, str::FromStr};

use crate::foundation::math::luma;

/// Opaque RGB colour in canonical `#RRGGBB` form.
///
/// A `ColorValue` can only be built from a strictly valid hex string or from raw channels, so
/// anything holding one never needs to re-validate it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorValue {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Free-text colour did not match `#` followed by exactly six hex digits.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color '{input}': expected '#' followed by 6 hex digits")]
pub struct ColorParseError {
    pub input: String,
}

impl ColorValue {
    /// Session default garment colour.
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (case-insensitive). No trimming and no implicit `#`.
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            input: input.to_owned(),
        };
        let digits = input.strip_prefix('#').ok_or_else(err)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Canonical uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceived brightness in `0.0..=255.0`.
    pub fn luma(self) -> f64 {
        luma(self.r, self.g, self.b)
    }

    /// Dark colours get a light grid overlay and light check marks.
    pub fn is_dark(self) -> bool {
        self.luma() < 128.0
    }

    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul {
            r: self.r,
            g: self.g,
            b: self.b,
            a: 255,
        }
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for ColorValue {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl serde::Serialize for ColorValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ColorValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Garment face a design can be placed on and the viewer can show.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    Front,
    Back,
}

impl Panel {
    pub const ALL: [Panel; 2] = [Panel::Front, Panel::Back];

    pub fn as_str(self) -> &'static str {
        match self {
            Panel::Front => "front",
            Panel::Back => "back",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Panel::Front),
            "back" => Ok(Panel::Back),
            other => Err(format!("unknown panel '{other}' (expected front|back)")),
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
