// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Plotting configuration
//!
//! A [`PlotConfig`] holds the defaults used when deriving font parameters,
//! creating figures and styling axes. It serializes to a flat JSON object
//! whose keys are exactly the field names:
//!
//! ```json
//! {
//!   "default_font": "Arial",
//!   "font_sizes": { "small": 8, "medium": 10, "big": 12 },
//!   "dpi": 300,
//!   "default_width": 10.0,
//!   "default_height": 8.0,
//!   "default_unit": "cm",
//!   "spine_width": 1.4,
//!   "grid_color": "C7",
//!   "grid_style": "--",
//!   "grid_width": 0.8,
//!   "color_palette": "deep"
//! }
//! ```

use crate::color::{Color, Palette};
use crate::figure::LineStyle;
use crate::units::Unit;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Three-tier font size scale, in points
///
/// `small` is used for tick labels and legends, `medium` for axis labels and
/// body text, `big` for titles. The tiers are expected (but not required) to
/// be non-decreasing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontSizes {
    pub small: u32,
    pub medium: u32,
    pub big: u32,
}

impl FontSizes {
    /// Construct from the three tiers
    pub const fn new(small: u32, medium: u32, big: u32) -> Self {
        FontSizes { small, medium, big }
    }
}

impl Default for FontSizes {
    fn default() -> Self {
        FontSizes::new(8, 10, 12)
    }
}

/// Style defaults for figure creation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub default_font: String,
    pub font_sizes: FontSizes,
    pub dpi: u32,
    pub default_width: f64,
    pub default_height: f64,
    pub default_unit: Unit,
    pub spine_width: f64,
    pub grid_color: String,
    pub grid_style: LineStyle,
    pub grid_width: f64,
    pub color_palette: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            default_font: "Arial".to_string(),
            font_sizes: FontSizes::default(),
            dpi: 300,
            default_width: 10.0,
            default_height: 8.0,
            default_unit: Unit::Centimeter,
            spine_width: 1.4,
            grid_color: "C7".to_string(),
            grid_style: LineStyle::Dashed,
            grid_width: 0.8,
            color_palette: "deep".to_string(),
        }
    }
}

/// Journal presets
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    Nature,
    Science,
    Cell,
    PlosOne,
}

impl Preset {
    /// All presets
    pub const ALL: [Preset; 4] = [Preset::Nature, Preset::Science, Preset::Cell, Preset::PlosOne];

    /// Preset name as accepted by [`PlotConfig::preset`]
    pub fn name(self) -> &'static str {
        match self {
            Preset::Nature => "nature",
            Preset::Science => "science",
            Preset::Cell => "cell",
            Preset::PlosOne => "plos_one",
        }
    }

    /// Look up a preset by (case-insensitive) name
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| Error::UnknownPreset {
                name: name.to_string(),
                available: Preset::ALL.map(Preset::name).join(", "),
            })
    }

    // (font, sizes, width cm, height cm, spine width)
    fn values(self) -> (&'static str, FontSizes, f64, f64, f64) {
        match self {
            // single column
            Preset::Nature => ("Arial", FontSizes::new(7, 8, 9), 8.3, 6.0, 1.0),
            Preset::Science => ("Arial", FontSizes::new(7, 8, 9), 8.5, 6.5, 1.2),
            // full page
            Preset::Cell => ("Arial", FontSizes::new(8, 9, 10), 17.8, 12.0, 1.4),
            Preset::PlosOne => ("Arial", FontSizes::new(8, 10, 12), 17.4, 12.0, 1.5),
        }
    }
}

impl PlotConfig {
    /// Smaller fonts and a compact default size
    pub fn minimal() -> Self {
        PlotConfig {
            font_sizes: FontSizes::new(6, 8, 10),
            default_width: 6.0,
            default_height: 4.5,
            ..Default::default()
        }
    }

    /// 600 DPI with larger fonts and a large default size
    pub fn high_res() -> Self {
        PlotConfig {
            dpi: 600,
            font_sizes: FontSizes::new(10, 12, 14),
            default_width: 15.0,
            default_height: 12.0,
            ..Default::default()
        }
    }

    /// The configured data palette
    ///
    /// Falls back to the default palette if the name is unknown; use
    /// [`Self::validate`] to reject such configurations.
    pub fn palette(&self) -> Palette {
        Palette::named(&self.color_palette).unwrap_or_default()
    }

    /// Check value constraints
    ///
    /// Sizes, widths and DPI must be positive; the grid color must parse and
    /// the palette must be known.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, v: f64) -> Result<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::MalformedConfig(format!("{name} must be positive, got {v}")))
            }
        }

        let sizes = self.font_sizes;
        if sizes.small == 0 || sizes.medium == 0 || sizes.big == 0 {
            return Err(Error::MalformedConfig(format!(
                "font sizes must be positive, got {sizes:?}"
            )));
        }
        if self.dpi == 0 {
            return Err(Error::MalformedConfig("dpi must be positive".to_string()));
        }
        positive("default_width", self.default_width)?;
        positive("default_height", self.default_height)?;
        positive("spine_width", self.spine_width)?;
        positive("grid_width", self.grid_width)?;

        let palette = Palette::named(&self.color_palette).ok_or_else(|| {
            Error::MalformedConfig(format!(
                "unknown color palette '{}'; available: {}",
                self.color_palette,
                Palette::names().collect::<Vec<_>>().join(", ")
            ))
        })?;
        Color::parse(&self.grid_color, &palette)?;
        Ok(())
    }

    /// Apply a partial update
    ///
    /// Each key must name a field of this struct; values must have the same
    /// shape as in the serialized document. The update is atomic: if any key
    /// is unknown or any value invalid, `self` is left unchanged.
    ///
    /// ```
    /// # use pubplot::PlotConfig;
    /// # use serde_json::json;
    /// let mut config = PlotConfig::default();
    /// config.update([("dpi", json!(600)), ("grid_style", json!(":"))]).unwrap();
    /// assert_eq!(config.dpi, 600);
    /// assert!(config.update([("colour", json!("red"))]).is_err());
    /// ```
    pub fn update<I, K>(&mut self, partial: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut map = self.to_map()?;
        for (key, value) in partial {
            let key = key.as_ref();
            match map.get_mut(key) {
                Some(slot) => *slot = value,
                None => return Err(Error::UnknownParameter(key.to_string())),
            }
        }

        let updated: PlotConfig = serde_json::from_value(Value::Object(map))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Get a copy with a journal preset applied
    ///
    /// The preset fixes font, size tiers, default width/height and spine
    /// width; all other fields are taken from `self`. Preset sizes are in
    /// the caller's `default_unit`, as with any other width/height value.
    pub fn preset(&self, name: &str) -> Result<PlotConfig> {
        let preset = Preset::from_name(name)?;
        let (font, sizes, width, height, spine) = preset.values();
        Ok(PlotConfig {
            default_font: font.to_string(),
            font_sizes: sizes,
            default_width: width,
            default_height: height,
            spine_width: spine,
            ..self.clone()
        })
    }

    fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => unreachable!("PlotConfig serializes to an object"),
        }
    }

    /// Serialize to a JSON document
    pub fn to_document(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON document
    ///
    /// The document must be a JSON object. Missing fields take their default
    /// value. Unknown fields, values of the wrong type and values failing
    /// [`Self::validate`] are rejected with [`Error::MalformedConfig`].
    pub fn from_document(doc: &str) -> Result<Self> {
        let map = match serde_json::from_str::<Value>(doc)? {
            Value::Object(map) => map,
            other => {
                return Err(Error::MalformedConfig(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
        };
        let config: PlotConfig = serde_json::from_value(Value::Object(map))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let doc = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_document(&doc)
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let doc = self.to_document()?;
        std::fs::write(path, doc).map_err(|e| Error::io(path, e))
    }
}

impl fmt::Display for PlotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PlotConfig(font={}, dpi={}, size={}x{}{})",
            self.default_font, self.dpi, self.default_width, self.default_height, self.default_unit
        )
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
