use crate::foundation::core::Rgba8;
use serde::{Deserialize, Serialize};

impl Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        ))
    }
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => parse_color(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => {
                let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
                match v.as_slice() {
                    [r, g, b] => Ok(Rgba8::rgb(to_u8(*r), to_u8(*g), to_u8(*b))),
                    [r, g, b, a] => Ok(Rgba8::rgba(to_u8(*r), to_u8(*g), to_u8(*b), to_u8(*a))),
                    _ => Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    )),
                }
            }
        }
    }
}

/// Parse `#RRGGBB`, `#RRGGBBAA` or a named colour (case-insensitive).
pub fn parse_color(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    named_color(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown colour \"{s}\" (use a name or #RRGGBB[AA])"))
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex colour must be ASCII".to_owned());
    }
    match s.len() {
        6 => Ok(Rgba8::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex colour must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

fn named_color(name: &str) -> Option<Rgba8> {
    let c = match name {
        "black" => Rgba8::rgb(0, 0, 0),
        "white" => Rgba8::rgb(255, 255, 255),
        "gray" | "grey" => Rgba8::rgb(128, 128, 128),
        "lightgray" | "lightgrey" => Rgba8::rgb(211, 211, 211),
        "darkgray" | "darkgrey" => Rgba8::rgb(169, 169, 169),
        "red" => Rgba8::rgb(255, 0, 0),
        "green" => Rgba8::rgb(0, 128, 0),
        "lime" => Rgba8::rgb(0, 255, 0),
        "blue" => Rgba8::rgb(0, 0, 255),
        "yellow" => Rgba8::rgb(255, 255, 0),
        "cyan" => Rgba8::rgb(0, 255, 255),
        "magenta" => Rgba8::rgb(255, 0, 255),
        "orange" => Rgba8::rgb(255, 165, 0),
        "purple" => Rgba8::rgb(128, 0, 128),
        "navy" => Rgba8::rgb(0, 0, 128),
        "transparent" => Rgba8::rgba(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}
