// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Figure factory

use crate::config::PlotConfig;
use crate::figure::{AxesGrid, Figure, Share, SubplotParams};
use crate::fonts::manager;
use crate::plot::Plot;
use crate::rc::{RcOverrides, RcParams};
use crate::style::{apply_style, StyleParams};
use crate::units::{to_engine_units, Unit};
use crate::{Error, Result};

/// Layout and size of a new figure
///
/// Unset width, height and unit are taken from the [`PlotConfig`]. The
/// default is a single plot area without sharing.
#[derive(Clone, Debug, PartialEq)]
pub struct FigureOptions {
    pub rows: usize,
    pub cols: usize,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit: Option<Unit>,
    pub sharex: Share,
    pub sharey: Share,
    pub subplot: Option<SubplotParams>,
}

impl Default for FigureOptions {
    fn default() -> Self {
        FigureOptions::grid(1, 1)
    }
}

impl FigureOptions {
    /// A single plot area
    pub fn new() -> Self {
        Self::default()
    }

    /// A `rows × cols` grid of plot areas
    pub fn grid(rows: usize, cols: usize) -> Self {
        FigureOptions {
            rows,
            cols,
            width: None,
            height: None,
            unit: None,
            sharex: Share::None,
            sharey: Share::None,
            subplot: None,
        }
    }

    /// Set the figure size
    pub fn size(mut self, width: f64, height: f64, unit: Unit) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self.unit = Some(unit);
        self
    }

    /// Set axis sharing
    pub fn share(mut self, sharex: impl Into<Share>, sharey: impl Into<Share>) -> Self {
        self.sharex = sharex.into();
        self.sharey = sharey.into();
        self
    }

    /// Set the spacing used before a tight layout is computed
    pub fn subplot(mut self, params: SubplotParams) -> Self {
        self.subplot = Some(params);
        self
    }
}

/// Entry point: creates styled figures from a [`PlotConfig`]
///
/// ```no_run
/// # use pubplot::{FigureOptions, PlotConfig, Plotting, SaveOptions, Unit};
/// # fn main() -> pubplot::Result<()> {
/// let plotting = Plotting::new(PlotConfig::default().preset("nature")?);
/// let (mut plot, axes) = plotting.create_figure(FigureOptions::new())?;
/// let ax = axes.single().unwrap();
/// plot[ax].plot(&[0.0, 1.0, 2.0], &[1.0, 3.0, 2.0])?;
/// plot[ax].set_xlabel("time (s)");
/// plot.save("figure.pdf", None, true, &SaveOptions::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Plotting {
    config: PlotConfig,
    rc: RcParams,
}

impl Plotting {
    /// Construct with `config`
    ///
    /// Loads fonts (first call per process only) and derives rendering
    /// parameters with [`RcParams::resolve`] and no overrides.
    pub fn new(config: PlotConfig) -> Self {
        manager().load_fonts(None);
        let rc = RcParams::resolve(&config, &RcOverrides::default())
            .unwrap_or_else(|_| RcParams::from_config(&config));
        Plotting { config, rc }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Rendering parameters used for new figures
    pub fn rc_params(&self) -> &RcParams {
        &self.rc
    }

    /// Re-derive rendering parameters from the config with `overrides`
    ///
    /// Parameters are rebuilt from scratch, so earlier overrides do not
    /// persist. On error the current parameters are kept.
    pub fn set_rc_params(&mut self, overrides: &RcOverrides) -> Result<()> {
        self.rc = RcParams::resolve(&self.config, overrides)?;
        Ok(())
    }

    /// Create a figure with a grid of plot areas
    ///
    /// Validates the layout and size, converts the size to inches, builds the
    /// figure with the current rendering parameters and applies the
    /// configured publication style. A 1×1 layout yields
    /// [`AxesGrid::Single`].
    pub fn create_figure(&self, options: FigureOptions) -> Result<(Plot, AxesGrid)> {
        let FigureOptions {
            rows,
            cols,
            width,
            height,
            unit,
            sharex,
            sharey,
            subplot,
        } = options;
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidLayout { rows, cols });
        }
        let width = width.unwrap_or(self.config.default_width);
        let height = height.unwrap_or(self.config.default_height);
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::InvalidDimensions { width, height });
        }
        let unit = unit.unwrap_or(self.config.default_unit);

        let mut figure = Figure::new(
            to_engine_units(width, unit),
            to_engine_units(height, unit),
            self.rc.clone(),
        );
        if let Some(params) = subplot {
            figure.set_subplot_params(params);
        }
        let axes = figure.subplots(rows, cols, sharex, sharey)?;
        log::debug!(
            "create_figure: {rows}×{cols} at {width}×{height}{unit}, \
            sharex={sharex:?}, sharey={sharey:?}"
        );

        let style = StyleParams::from_config(&self.config);
        let mut plot = Plot::with_style(figure, style.clone());
        apply_style(&mut plot, &style)?;
        Ok((plot, axes))
    }
}

impl Default for Plotting {
    fn default() -> Self {
        Plotting::new(PlotConfig::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::figure::Side;

    #[test]
    fn single_axes() {
        let plotting = Plotting::default();
        let (plot, axes) = plotting.create_figure(FigureOptions::new()).unwrap();
        assert!(axes.single().is_some());
        assert_eq!(plot.axes().len(), 1);
        assert!(plot.style_applied());
        let (w, h) = plot.size_inches();
        assert!((w - 10.0 / 2.54).abs() < 1e-12);
        assert!((h - 8.0 / 2.54).abs() < 1e-12);
    }

    #[test]
    fn grid_with_sharing() {
        let plotting = Plotting::default();
        let options = FigureOptions::grid(2, 3)
            .size(6.0, 4.0, Unit::Inch)
            .share(true, Share::Row);
        let (plot, axes) = plotting.create_figure(options).unwrap();
        assert_eq!(axes.len(), 6);
        assert_eq!(plot.grid_shape(), (2, 3));
        assert_eq!(plot.size_inches(), (6.0, 4.0));
        let ax = &plot[axes.get(0, 1).unwrap()];
        assert!(!ax.shows_xticklabels());
        assert!(!ax.shows_yticklabels());
        assert!(!ax.spines[Side::Right].visible);
    }

    #[test]
    fn invalid_inputs() {
        let plotting = Plotting::default();
        assert!(matches!(
            plotting.create_figure(FigureOptions::grid(0, 2)),
            Err(Error::InvalidLayout { rows: 0, cols: 2 })
        ));
        for (w, h) in [(0.0, 5.0), (5.0, -1.0), (f64::NAN, 5.0), (5.0, f64::INFINITY)] {
            assert!(matches!(
                plotting.create_figure(FigureOptions::new().size(w, h, Unit::Centimeter)),
                Err(Error::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn style_follows_config() {
        let config = PlotConfig::default().preset("plos_one").unwrap();
        let plotting = Plotting::new(config);
        let (plot, _) = plotting.create_figure(FigureOptions::new()).unwrap();
        assert_eq!(plot.axes()[0].spines[Side::Left].width, 1.5);
        assert_eq!(plot.default_style().spine_width, 1.5);
        let (w, _) = plot.size_inches();
        assert!((w - 17.4 / 2.54).abs() < 1e-12);
    }

    #[test]
    fn rc_overrides() {
        let mut plotting = Plotting::default();
        plotting
            .set_rc_params(&RcOverrides::default().sizes(6, 7, 9))
            .unwrap();
        assert_eq!(plotting.rc_params().title_size, 9.0);
        let (plot, _) = plotting.create_figure(FigureOptions::new()).unwrap();
        assert_eq!(plot.rc().tick_label_size, 6.0);

        let bad = RcOverrides::default().with("nope", serde_json::json!(1));
        assert!(plotting.set_rc_params(&bad).is_err());
        assert_eq!(plotting.rc_params().title_size, 9.0);
    }
}
