//! Straight-alpha RGBA color used by every layer and primitive.
//!
//! Channels are 0-255; alpha is *not* premultiplied into the color
//! channels. Premultiplication only happens inside resampling kernels
//! (rotation, blur) where straight-alpha interpolation would fringe.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a replacement alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha scaled by `f` in 0..=1 (clamped).
    pub fn fade(self, f: f64) -> Self {
        let a = (f64::from(self.a) * f.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Linear interpolation between two colors, `t` clamped to 0..=1.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |x: u8, y: u8| -> u8 {
            (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8
        };
        Self {
            r: ch(a.r, b.r),
            g: ch(a.g, b.g),
            b: ch(a.b, b.b),
            a: ch(a.a, b.a),
        }
    }

    /// Three-stop gradient: `a` at t=0, `mid` at t=0.5, `b` at t=1.
    pub fn lerp3(a: Self, mid: Self, b: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            Self::lerp(a, mid, t * 2.0)
        } else {
            Self::lerp(mid, b, (t - 0.5) * 2.0)
        }
    }

    /// Hex form accepted back by [`Rgba::parse_hex`]: `#RRGGBB` for opaque
    /// colors, `#RRGGBBAA` otherwise.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        match s.len() {
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            )),
            _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
        }
    }
}

// serialize to the same hex form the deserializer accepts, so a dumped
// theme loads back unchanged
impl Serialize for Rgba {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Rgba::parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(Rgba::rgb(v[0], v[1], v[2]))
                } else if v.len() == 4 {
                    Ok(Rgba::rgba(v[0], v[1], v[2], v[3]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_rgb_and_rgba() {
        assert_eq!(Rgba::parse_hex("#E5FF00").unwrap(), Rgba::rgb(229, 255, 0));
        assert_eq!(
            Rgba::parse_hex("0a0a0a80").unwrap(),
            Rgba::rgba(10, 10, 10, 128)
        );
        assert!(Rgba::parse_hex("#fff").is_err());
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgba::rgb(0, 0, 0);
        let b = Rgba::rgb(255, 255, 255);
        assert_eq!(Rgba::lerp(a, b, 0.0), a);
        assert_eq!(Rgba::lerp(a, b, 1.0), b);
        assert_eq!(Rgba::lerp(a, b, 0.5).r, 128);
    }

    #[test]
    fn lerp3_hits_midpoint() {
        let a = Rgba::rgb(0, 0, 0);
        let m = Rgba::rgb(10, 20, 30);
        let b = Rgba::rgb(255, 255, 255);
        assert_eq!(Rgba::lerp3(a, m, b, 0.5), m);
    }

    #[test]
    fn deserialize_hex_and_array() {
        let c: Rgba = serde_json::from_str("\"#E5FF00\"").unwrap();
        assert_eq!(c, Rgba::rgb(229, 255, 0));
        let c: Rgba = serde_json::from_str("[1,2,3,4]").unwrap();
        assert_eq!(c, Rgba::rgba(1, 2, 3, 4));
    }

    #[test]
    fn serialize_round_trips_through_hex() {
        for c in [Rgba::rgb(229, 255, 0), Rgba::rgba(10, 10, 10, 128)] {
            let json = serde_json::to_string(&c).unwrap();
            let back: Rgba = serde_json::from_str(&json).unwrap();
            assert_eq!(back, c);
        }
        assert_eq!(serde_json::to_string(&Rgba::WHITE).unwrap(), "\"#FFFFFF\"");
    }
}
