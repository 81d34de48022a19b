// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Rendering parameters
//!
//! [`RcParams`] carries the font and resolution settings a [`Figure`] is
//! drawn with. There is no global parameter table: a value is derived from a
//! [`PlotConfig`] (see [`RcParams::resolve`]) and handed to each figure.
//!
//! [`Figure`]: crate::figure::Figure

use crate::config::PlotConfig;
use crate::fonts::{manager, FALLBACK_FAMILY};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Font, size and resolution parameters of a figure
///
/// Font sizes are in points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RcParams {
    pub font_family: String,
    /// Base font size
    pub font_size: f64,
    pub title_size: f64,
    /// Axis label size
    pub label_size: f64,
    pub tick_label_size: f64,
    pub legend_size: f64,
    /// Nominal figure resolution
    pub dpi: u32,
    /// Resolution used when saving raster output
    pub savefig_dpi: u32,
    /// Embed the font program in vector documents
    pub embed_fonts: bool,
    /// Name of the data color palette
    pub palette: String,
    /// Default data line width
    pub line_width: f64,
}

impl Default for RcParams {
    fn default() -> Self {
        RcParams {
            font_family: FALLBACK_FAMILY.to_string(),
            font_size: 10.0,
            title_size: 12.0,
            label_size: 10.0,
            tick_label_size: 10.0,
            legend_size: 10.0,
            dpi: 100,
            savefig_dpi: 100,
            embed_fonts: false,
            palette: "tab10".to_string(),
            line_width: 1.5,
        }
    }
}

/// Optional overrides for [`RcParams::resolve`]
///
/// Unset fields are taken from the [`PlotConfig`]. `extra` is applied last
/// via [`RcParams::update`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RcOverrides {
    pub font_family: Option<String>,
    pub small: Option<u32>,
    pub medium: Option<u32>,
    pub big: Option<u32>,
    pub extra: Vec<(String, Value)>,
}

impl RcOverrides {
    /// Set the font family
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Set the three font size tiers
    pub fn sizes(mut self, small: u32, medium: u32, big: u32) -> Self {
        self.small = Some(small);
        self.medium = Some(medium);
        self.big = Some(big);
        self
    }

    /// Add a raw parameter, as accepted by [`RcParams::update`]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.push((key.into(), value));
        self
    }
}

impl RcParams {
    /// Derive from `config` without font resolution
    ///
    /// Tick labels and legends use the small tier, axis labels and body text
    /// the medium tier, titles the big tier.
    pub fn from_config(config: &PlotConfig) -> Self {
        let sizes = config.font_sizes;
        RcParams {
            font_family: config.default_font.clone(),
            font_size: f64::from(sizes.medium),
            title_size: f64::from(sizes.big),
            label_size: f64::from(sizes.medium),
            tick_label_size: f64::from(sizes.small),
            legend_size: f64::from(sizes.small),
            dpi: config.dpi,
            savefig_dpi: config.dpi,
            embed_fonts: true,
            palette: config.color_palette.clone(),
            ..Default::default()
        }
    }

    /// Derive from `config` with `overrides`
    ///
    /// The font family is checked with the [`crate::fonts::FontManager`];
    /// an unavailable family is replaced by [`FALLBACK_FAMILY`] (recording a
    /// warning). Zero sizes in `overrides` count as unset.
    pub fn resolve(config: &PlotConfig, overrides: &RcOverrides) -> Result<Self> {
        let mut sizes = config.font_sizes;
        let tier = |over: Option<u32>, default: u32| over.filter(|v| *v > 0).unwrap_or(default);
        sizes.small = tier(overrides.small, sizes.small);
        sizes.medium = tier(overrides.medium, sizes.medium);
        sizes.big = tier(overrides.big, sizes.big);

        let family = overrides
            .font_family
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(&config.default_font);

        let mut rc = RcParams::from_config(&PlotConfig {
            font_sizes: sizes,
            ..config.clone()
        });
        rc.font_family = manager().resolve_family(family);
        rc.update(overrides.extra.iter().map(|(k, v)| (k.as_str(), v.clone())))?;
        Ok(rc)
    }

    /// Apply a partial update
    ///
    /// Keys are field names. Unknown keys give [`Error::UnknownParameter`];
    /// values of the wrong shape give [`Error::MalformedConfig`]. On error
    /// `self` is unchanged.
    pub fn update<I, K>(&mut self, partial: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut map: Map<String, Value> = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => unreachable!("RcParams serializes to an object"),
        };
        for (key, value) in partial {
            let key = key.as_ref();
            match map.get_mut(key) {
                Some(slot) => *slot = value,
                None => return Err(Error::UnknownParameter(key.to_string())),
            }
        }
        *self = serde_json::from_value(Value::Object(map))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_config_tiers() {
        let config = PlotConfig::default();
        let rc = RcParams::from_config(&config);
        assert_eq!(rc.font_family, "Arial");
        assert_eq!(rc.title_size, 12.0);
        assert_eq!(rc.label_size, 10.0);
        assert_eq!(rc.font_size, 10.0);
        assert_eq!(rc.tick_label_size, 8.0);
        assert_eq!(rc.legend_size, 8.0);
        assert_eq!(rc.dpi, 300);
        assert_eq!(rc.savefig_dpi, 300);
        assert!(rc.embed_fonts);
        assert_eq!(rc.palette, "deep");
    }

    #[test]
    fn resolve_overrides() {
        let config = PlotConfig::default();
        let overrides = RcOverrides::default()
            .font_family("NonexistentFontXYZ")
            .sizes(5, 6, 0)
            .with("line_width", json!(2.0));
        let rc = RcParams::resolve(&config, &overrides).unwrap();
        assert_eq!(rc.font_family, FALLBACK_FAMILY);
        assert_eq!(rc.tick_label_size, 5.0);
        assert_eq!(rc.label_size, 6.0);
        // zero counts as unset
        assert_eq!(rc.title_size, 12.0);
        assert_eq!(rc.line_width, 2.0);
    }

    #[test]
    fn resolve_rejects_unknown_extra() {
        let overrides = RcOverrides::default().with("axes.facecolor", json!("red"));
        let err = RcParams::resolve(&PlotConfig::default(), &overrides).unwrap_err();
        assert!(matches!(err, Error::UnknownParameter(ref k) if k == "axes.facecolor"));
    }

    #[test]
    fn update_is_atomic() {
        let mut rc = RcParams::default();
        assert!(rc
            .update([("dpi", json!(600)), ("font_size", json!("big"))])
            .is_err());
        assert_eq!(rc, RcParams::default());
        rc.update([("embed_fonts", json!(true))]).unwrap();
        assert!(rc.embed_fonts);
    }
}
