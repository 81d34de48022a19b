// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Publication style

use crate::color::Color;
use crate::config::PlotConfig;
use crate::figure::{GridAxis, GridLines, LineStyle, Side, Sides, TickDirection};
use crate::plot::Plot;
use crate::{Error, Result};

/// Opacity of gridlines
pub const GRID_ALPHA: f64 = 0.7;

/// Parameters of [`apply_style`]
///
/// Offsets and widths are in points.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleParams {
    /// Hide the top and right spines
    pub despine: bool,
    /// Draw horizontal gridlines
    pub grid: bool,
    pub offset_left: f64,
    pub offset_bottom: f64,
    pub spine_width: f64,
    /// Gridline color specification, see [`Color::parse`]
    pub grid_color: String,
    pub grid_style: LineStyle,
    pub grid_width: f64,
    pub grid_alpha: f64,
}

impl Default for StyleParams {
    fn default() -> Self {
        StyleParams {
            despine: true,
            grid: true,
            offset_left: 5.0,
            offset_bottom: 5.0,
            spine_width: 1.4,
            grid_color: "C7".to_string(),
            grid_style: LineStyle::Dashed,
            grid_width: 0.8,
            grid_alpha: GRID_ALPHA,
        }
    }
}

impl StyleParams {
    /// Take spine and grid settings from `config`
    pub fn from_config(config: &PlotConfig) -> Self {
        StyleParams {
            spine_width: config.spine_width,
            grid_color: config.grid_color.clone(),
            grid_style: config.grid_style,
            grid_width: config.grid_width,
            ..Default::default()
        }
    }
}

fn check_width(name: &str, v: f64, allow_zero: bool) -> Result<()> {
    if v.is_finite() && (v > 0.0 || (allow_zero && v == 0.0)) {
        Ok(())
    } else {
        Err(Error::MalformedConfig(format!("{name}: invalid value {v}")))
    }
}

/// Apply the publication style to every plot area of `plot`
///
/// Hides the top and right spines (if `despine`), moves the left and bottom
/// spines outward, sets spine and tick widths, draws ticks outward on the
/// bottom and left sides and sets (or removes) a single layer of horizontal
/// gridlines. Finally the figure is laid out tightly and marked as styled.
///
/// Applying the style twice gives the same result as applying it once.
/// Parameters are validated before anything is modified.
pub fn apply_style<'a>(plot: &'a mut Plot, params: &StyleParams) -> Result<&'a mut Plot> {
    check_width("spine_width", params.spine_width, false)?;
    check_width("grid_width", params.grid_width, false)?;
    check_width("offset_left", params.offset_left, true)?;
    check_width("offset_bottom", params.offset_bottom, true)?;
    if !(0.0..=1.0).contains(&params.grid_alpha) {
        return Err(Error::MalformedConfig(format!(
            "grid_alpha must be in 0..=1, got {}",
            params.grid_alpha
        )));
    }
    let grid_color = Color::parse(&params.grid_color, &plot.palette())?;

    let grid = match grid_color {
        Some(color) if params.grid => Some(GridLines {
            axis: GridAxis::Y,
            color,
            style: params.grid_style,
            width: params.grid_width,
            alpha: params.grid_alpha,
        }),
        _ => None,
    };

    let width = params.spine_width;
    for ax in plot.axes_mut() {
        if params.despine {
            ax.spines[Side::Top].visible = false;
            ax.spines[Side::Right].visible = false;
        }
        ax.spines[Side::Left].offset = params.offset_left;
        ax.spines[Side::Bottom].offset = params.offset_bottom;
        for (_, spine) in ax.spines.iter_mut() {
            spine.width = width;
        }

        ax.set_grid(grid.clone());

        let major = &mut ax.major_ticks;
        major.direction = TickDirection::Out;
        major.length = 3.0;
        major.width = width;
        major.sides = Sides::BOTTOM | Sides::LEFT;

        let minor = &mut ax.minor_ticks;
        minor.direction = TickDirection::Out;
        minor.length = 2.0;
        minor.width = width / 2.0;
        minor.sides = Sides::BOTTOM | Sides::LEFT;
    }

    plot.tight_layout();
    plot.style_applied = true;
    log::debug!("apply_style: styled {} plot areas", plot.axes().len());
    Ok(plot)
}
