// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Colors and color palettes
//!
//! Color specifications follow the usual plotting conventions:
//!
//! -   `#rrggbb` hex strings
//! -   `C0` … `C9`, the n-th color of the active palette
//! -   a small set of names (`black`, `white`, `gray`, …) and the single
//!     letter shorthands `k`, `w`, `r`, `g`, `b`
//! -   `none` for "no color"

use crate::{Error, Result};
use std::fmt;

/// An opaque RGB color
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Construct from components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color { r, g, b })
    }

    /// Parse a color specification
    ///
    /// `C<n>` indices are resolved against `palette`. Returns `Ok(None)` for
    /// `"none"`.
    pub fn parse(spec: &str, palette: &Palette) -> Result<Option<Self>> {
        let spec = spec.trim();
        if spec.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        if let Some(color) = Color::from_hex(spec) {
            return Ok(Some(color));
        }
        if let Some(index) = spec.strip_prefix('C') {
            if let Ok(index) = index.parse::<usize>() {
                return Ok(Some(palette.color(index)));
            }
        }
        named(spec)
            .map(Some)
            .ok_or_else(|| Error::MalformedConfig(format!("invalid color '{spec}'")))
    }

    /// Components in the range `0.0..=1.0`
    pub fn to_f32(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Composite `self` with opacity `alpha` over `background`
    pub fn blend_over(self, background: Color, alpha: f64) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            let v = f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha);
            v.round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: mix(self.r, background.r),
            g: mix(self.g, background.g),
            b: mix(self.b, background.b),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn named(name: &str) -> Option<Color> {
    Some(match name.to_ascii_lowercase().as_str() {
        "k" | "black" => Color::BLACK,
        "w" | "white" => Color::WHITE,
        "r" | "red" => Color::rgb(255, 0, 0),
        "g" | "green" => Color::rgb(0, 128, 0),
        "b" | "blue" => Color::rgb(0, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "lightgray" | "lightgrey" => Color::rgb(211, 211, 211),
        "darkgray" | "darkgrey" => Color::rgb(169, 169, 169),
        _ => return None,
    })
}

const DEEP: [u32; 10] = [
    0x4C72B0, 0xDD8452, 0x55A868, 0xC44E52, 0x8172B3, 0x937860, 0xDA8BC3, 0x8C8C8C, 0xCCB974,
    0x64B5CD,
];
const MUTED: [u32; 10] = [
    0x4878D0, 0xEE854A, 0x6ACC64, 0xD65F5F, 0x956CB4, 0x8C613C, 0xDC7EC0, 0x797979, 0xD5BB67,
    0x82C6E2,
];
const PASTEL: [u32; 10] = [
    0xA1C9F4, 0xFFB482, 0x8DE5A1, 0xFF9F9B, 0xD0BBFF, 0xDEBB9B, 0xFAB0E4, 0xCFCFCF, 0xFFFEA3,
    0xB9F2F0,
];
const BRIGHT: [u32; 10] = [
    0x023EFF, 0xFF7C00, 0x1AC938, 0xE8000B, 0x8B2BE2, 0x9F4800, 0xF14CC1, 0xA3A3A3, 0xFFC400,
    0x00D7FF,
];
const DARK: [u32; 10] = [
    0x001C7F, 0xB1400D, 0x12711C, 0x8C0800, 0x591E71, 0x592F0D, 0xA23582, 0x3C3C3C, 0xB8850A,
    0x006374,
];
const COLORBLIND: [u32; 10] = [
    0x0173B2, 0xDE8F05, 0x029E73, 0xD55E00, 0xCC78BC, 0xCA9161, 0xFBAFE4, 0x949494, 0xECE133,
    0x56B4E9,
];
const TAB10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

const PALETTES: [(&str, &[u32; 10]); 7] = [
    ("deep", &DEEP),
    ("muted", &MUTED),
    ("pastel", &PASTEL),
    ("bright", &BRIGHT),
    ("dark", &DARK),
    ("colorblind", &COLORBLIND),
    ("tab10", &TAB10),
];

/// A named, cyclic list of data colors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    name: &'static str,
    colors: &'static [u32; 10],
}

impl Palette {
    /// Look up a palette by name
    pub fn named(name: &str) -> Option<Self> {
        PALETTES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(name, colors)| Palette { name, colors })
    }

    /// Names of all known palettes
    pub fn names() -> impl Iterator<Item = &'static str> {
        PALETTES.iter().map(|(n, _)| *n)
    }

    /// Name of this palette
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the color at `index`, cycling
    pub fn color(&self, index: usize) -> Color {
        let v = self.colors[index % self.colors.len()];
        Color::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            name: "deep",
            colors: &DEEP,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_specs() {
        let deep = Palette::default();
        assert_eq!(
            Color::parse("#ff8000", &deep).unwrap(),
            Some(Color::rgb(255, 128, 0))
        );
        assert_eq!(
            Color::parse("C7", &deep).unwrap(),
            Some(Color::rgb(0x8C, 0x8C, 0x8C))
        );
        let tab10 = Palette::named("tab10").unwrap();
        assert_eq!(Color::parse("C7", &tab10).unwrap().unwrap().to_string(), "#7f7f7f");
        assert_eq!(Color::parse("none", &deep).unwrap(), None);
        assert_eq!(Color::parse("k", &deep).unwrap(), Some(Color::BLACK));
        assert!(Color::parse("#12", &deep).is_err());
        assert!(Color::parse("C", &deep).is_err());
        assert!(Color::parse("chartreuse-ish", &deep).is_err());
    }

    #[test]
    fn palette_cycles() {
        let p = Palette::named("colorblind").unwrap();
        assert_eq!(p.color(0), p.color(10));
        assert!(Palette::named("viridis").is_none());
        assert_eq!(Palette::names().count(), 7);
    }

    #[test]
    fn blend() {
        let c = Color::BLACK.blend_over(Color::WHITE, 0.5);
        assert_eq!(c, Color::rgb(128, 128, 128));
        assert_eq!(Color::BLACK.blend_over(Color::WHITE, 1.0), Color::BLACK);
    }
}
