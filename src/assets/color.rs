use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;

/// Named text colors offered by the slide customizer palette.
pub const PRESETS: &[(&str, Rgba8)] = &[
    ("white", Rgba8::opaque(0xff, 0xff, 0xff)),
    ("black", Rgba8::opaque(0x00, 0x00, 0x00)),
    ("purple", Rgba8::opaque(0xa8, 0x55, 0xf7)),
    ("pink", Rgba8::opaque(0xec, 0x48, 0x99)),
    ("yellow", Rgba8::opaque(0xfb, 0xbf, 0x24)),
    ("blue", Rgba8::opaque(0x3b, 0x82, 0xf6)),
    ("green", Rgba8::opaque(0x10, 0xb9, 0x81)),
    ("red", Rgba8::opaque(0xef, 0x44, 0x44)),
];

/// Text fill color. Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, a preset name, or a `[r,g,b(,a)]`
/// array of normalized floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextColor(pub Rgba8);

impl Default for TextColor {
    fn default() -> Self {
        Self(Rgba8::WHITE)
    }
}

impl TextColor {
    pub fn rgba(self) -> Rgba8 {
        self.0
    }

    /// Parse a CSS-style hex string or preset name.
    pub fn parse(s: &str) -> Result<Self, String> {
        let t = s.trim();
        if let Some((_, c)) = PRESETS.iter().find(|(name, _)| name.eq_ignore_ascii_case(t)) {
            return Ok(Self(*c));
        }
        parse_hex(t).map(Self)
    }

    pub fn to_hex(self) -> String {
        let Rgba8 { r, g, b, a } = self.0;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl std::str::FromStr for TextColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TextColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TextColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Arr(Vec<f64>),
        }

        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self(Rgba8::opaque(to_u8(*r), to_u8(*g), to_u8(*b)))),
                [r, g, b, a] => Ok(Self(Rgba8::new(to_u8(*r), to_u8(*g), to_u8(*b), to_u8(*a)))),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return Err(format!("invalid color \"{s}\""));
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = hex_byte(c)?;
        Ok(v * 17)
    }

    match s.len() {
        3 => Ok(Rgba8::opaque(
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
        )),
        6 => Ok(Rgba8::opaque(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("color must be #RGB, #RRGGBB, #RRGGBBAA or a preset name".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
