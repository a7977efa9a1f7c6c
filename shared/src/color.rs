use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque color as declared by a palette swatch.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`, falling back to black.
    pub fn parse_or_black(value: &str) -> Self {
        match value.parse() {
            Ok(color) => color,
            Err(_) => {
                log::warn!("Unrecognized color {value:?}, using black");
                Rgb::BLACK
            }
        }
    }

    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLACK
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("color must start with '#': {value:?}"))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid hex digits in color {value:?}"));
        }
        let channel = |text: &str| u8::from_str_radix(text, 16).map_err(|e| e.to_string());
        match hex.len() {
            3 => {
                let expand = |index: usize| channel(hex[index..index + 1].repeat(2).as_str());
                Ok(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Rgb::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(format!("color must have 3 or 6 hex digits: {value:?}")),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_css()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_long_and_short_hex() {
        assert_eq!("#ff8000".parse::<Rgb>(), Ok(Rgb::new(255, 128, 0)));
        assert_eq!("#F80".parse::<Rgb>(), Ok(Rgb::new(255, 136, 0)));
        assert_eq!(Rgb::new(255, 128, 0).to_css(), "#ff8000");
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert!("red".parse::<Rgb>().is_err());
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert_eq!(Rgb::parse_or_black("nonsense"), Rgb::BLACK);
    }

    #[test]
    fn test_serializes_as_css_string() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Rgb = serde_json::from_str("\"#abc\"").unwrap();
        assert_eq!(back, Rgb::new(0xaa, 0xbb, 0xcc));
    }
}
