// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Plot areas

use super::{LineStyle, Side, Sides};
use crate::color::{Color, Palette};
use crate::{Error, Result};
use std::ops::{Index, IndexMut};

/// The line marking one edge of a plot area
#[derive(Clone, Debug, PartialEq)]
pub struct Spine {
    pub visible: bool,
    /// Outward offset from the plot area, in points
    pub offset: f64,
    /// Stroke width in points
    pub width: f64,
    pub color: Color,
}

impl Default for Spine {
    fn default() -> Self {
        Spine {
            visible: true,
            offset: 0.0,
            width: 0.8,
            color: Color::BLACK,
        }
    }
}

/// The four spines of a plot area, indexed by [`Side`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spines([Spine; 4]);

impl Spines {
    pub fn iter(&self) -> impl Iterator<Item = (Side, &Spine)> {
        Side::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut Spine)> {
        Side::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl Index<Side> for Spines {
    type Output = Spine;
    fn index(&self, side: Side) -> &Spine {
        &self.0[side as usize]
    }
}

impl IndexMut<Side> for Spines {
    fn index_mut(&mut self, side: Side) -> &mut Spine {
        &mut self.0[side as usize]
    }
}

/// Direction of tick marks relative to the plot area
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickDirection {
    In,
    #[default]
    Out,
    InOut,
}

/// Appearance of one class (major or minor) of tick marks
#[derive(Clone, Debug, PartialEq)]
pub struct TickParams {
    pub direction: TickDirection,
    /// Tick length in points
    pub length: f64,
    /// Stroke width in points
    pub width: f64,
    /// Sides on which ticks are drawn
    pub sides: Sides,
    pub color: Color,
}

impl TickParams {
    /// Default major ticks
    pub fn major() -> Self {
        TickParams {
            direction: TickDirection::Out,
            length: 3.5,
            width: 0.8,
            sides: Sides::BOTTOM | Sides::LEFT,
            color: Color::BLACK,
        }
    }

    /// Default minor ticks
    pub fn minor() -> Self {
        TickParams {
            length: 2.0,
            width: 0.6,
            ..Self::major()
        }
    }
}

/// Which axis gridlines are aligned to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GridAxis {
    /// Vertical lines at x ticks
    X,
    /// Horizontal lines at y ticks
    Y,
    Both,
}

/// A layer of gridlines drawn behind data
#[derive(Clone, Debug, PartialEq)]
pub struct GridLines {
    pub axis: GridAxis,
    pub color: Color,
    pub style: LineStyle,
    pub width: f64,
    pub alpha: f64,
}

/// A data series drawn as a polyline
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: Color,
    pub width: f64,
    pub style: LineStyle,
    pub label: Option<String>,
}

impl Line {
    /// Set the color
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Set the stroke width in points
    pub fn width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self
    }

    /// Set the dash style
    pub fn style(&mut self, style: LineStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Set the legend label
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .map(|(x, y)| (*x, *y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// Explicit tick positions and labels for one axis
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct AxisSettings {
    pub label: String,
    pub limits: Option<(f64, f64)>,
    pub ticks: Option<Vec<f64>>,
    pub tick_labels: Option<Vec<String>>,
    pub show_tick_labels: bool,
}

/// A plot area (axes)
///
/// Each axes belongs to exactly one [`super::Figure`] and is addressed via
/// an [`super::AxesId`].
#[derive(Clone, Debug, PartialEq)]
pub struct Axes {
    pub spines: Spines,
    pub major_ticks: TickParams,
    pub minor_ticks: TickParams,
    /// Whether minor ticks are drawn
    pub minor_visible: bool,
    pub(crate) grid: Option<GridLines>,
    pub(crate) lines: Vec<Line>,
    pub(crate) title: String,
    pub(crate) x: AxisSettings,
    pub(crate) y: AxisSettings,
    pub(crate) row: usize,
    pub(crate) col: usize,
    palette: Palette,
    line_width: f64,
}

impl Axes {
    pub(crate) fn new(row: usize, col: usize, palette: Palette, line_width: f64) -> Self {
        let axis = AxisSettings {
            show_tick_labels: true,
            ..Default::default()
        };
        Axes {
            spines: Spines::default(),
            major_ticks: TickParams::major(),
            minor_ticks: TickParams::minor(),
            minor_visible: false,
            grid: None,
            lines: Vec::new(),
            title: String::new(),
            x: axis.clone(),
            y: axis,
            row,
            col,
            palette,
            line_width,
        }
    }

    /// Position in the figure's grid as `(row, col)`
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Draw a line series
    ///
    /// The color is taken from the palette cycle; use the returned
    /// reference to adjust it.
    pub fn plot(&mut self, xs: &[f64], ys: &[f64]) -> Result<&mut Line> {
        if xs.len() != ys.len() {
            return Err(Error::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        let color = self.palette.color(self.lines.len());
        self.lines.push(Line {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            color,
            width: self.line_width,
            style: LineStyle::Solid,
            label: None,
        });
        let last = self.lines.len() - 1;
        Ok(&mut self.lines[last])
    }

    /// Line series drawn so far
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The gridline layer, if any
    pub fn grid(&self) -> Option<&GridLines> {
        self.grid.as_ref()
    }

    /// Set or remove the gridline layer
    ///
    /// An axes has at most one grid layer; setting replaces it.
    pub fn set_grid(&mut self, grid: Option<GridLines>) {
        self.grid = grid;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn xlabel(&self) -> &str {
        &self.x.label
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.x.label = label.into();
    }

    pub fn ylabel(&self) -> &str {
        &self.y.label
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.y.label = label.into();
    }

    /// Explicit x limits, if set
    pub fn xlim(&self) -> Option<(f64, f64)> {
        self.x.limits
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.x.limits = Some((lo, hi));
    }

    /// Explicit y limits, if set
    pub fn ylim(&self) -> Option<(f64, f64)> {
        self.y.limits
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.y.limits = Some((lo, hi));
    }

    /// Fix x tick positions (otherwise chosen automatically)
    pub fn set_xticks(&mut self, ticks: &[f64]) {
        self.x.ticks = Some(ticks.to_vec());
    }

    /// Fix y tick positions (otherwise chosen automatically)
    pub fn set_yticks(&mut self, ticks: &[f64]) {
        self.y.ticks = Some(ticks.to_vec());
    }

    /// Label fixed x ticks
    ///
    /// Labels are matched to positions from [`Self::set_xticks`] in order.
    pub fn set_xticklabels<S: ToString>(&mut self, labels: &[S]) {
        self.x.tick_labels = Some(labels.iter().map(|s| s.to_string()).collect());
    }

    /// Label fixed y ticks
    pub fn set_yticklabels<S: ToString>(&mut self, labels: &[S]) {
        self.y.tick_labels = Some(labels.iter().map(|s| s.to_string()).collect());
    }

    /// Whether x tick labels are drawn
    pub fn shows_xticklabels(&self) -> bool {
        self.x.show_tick_labels
    }

    /// Whether y tick labels are drawn
    pub fn shows_yticklabels(&self) -> bool {
        self.y.show_tick_labels
    }

    /// Draw minor ticks between major ticks
    pub fn minorticks_on(&mut self) {
        self.minor_visible = true;
    }

    pub(crate) fn data_range(&self, axis: super::Axis) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for (x, y) in self.lines.iter().flat_map(Line::finite_points) {
            let v = match axis {
                super::Axis::X => x,
                super::Axis::Y => y,
            };
            range = Some(match range {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        range
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plot_cycles_palette() {
        let palette = Palette::default();
        let mut ax = Axes::new(0, 0, palette, 1.5);
        ax.plot(&[0.0, 1.0], &[1.0, 2.0]).unwrap();
        ax.plot(&[0.0, 1.0], &[3.0, 4.0])
            .unwrap()
            .label("second")
            .style(LineStyle::Dotted);
        assert_eq!(ax.lines()[0].color, palette.color(0));
        assert_eq!(ax.lines()[1].color, palette.color(1));
        assert_eq!(ax.lines()[1].label.as_deref(), Some("second"));
        assert_eq!(ax.data_range(crate::figure::Axis::Y), Some((1.0, 4.0)));
    }

    #[test]
    fn plot_length_mismatch() {
        let mut ax = Axes::new(0, 0, Palette::default(), 1.5);
        assert!(matches!(
            ax.plot(&[0.0], &[1.0, 2.0]),
            Err(Error::LengthMismatch { x: 1, y: 2 })
        ));
        assert!(ax.lines().is_empty());
    }

    #[test]
    fn non_finite_points_ignored() {
        let mut ax = Axes::new(0, 0, Palette::default(), 1.5);
        ax.plot(&[0.0, f64::NAN, 2.0], &[1.0, 5.0, f64::INFINITY])
            .unwrap();
        assert_eq!(ax.data_range(crate::figure::Axis::X), Some((0.0, 0.0)));
    }
}
