// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Figure object model
//!
//! A [`Figure`] is a canvas holding a grid of plot areas ([`Axes`]). Axes are
//! owned by their figure and addressed through [`AxesId`] handles:
//!
//! ```
//! # use pubplot::figure::{Figure, Share};
//! # use pubplot::RcParams;
//! let mut fig = Figure::new(4.0, 3.0, RcParams::default());
//! let grid = fig.subplots(1, 2, Share::None, Share::All).unwrap();
//! fig[grid[0]].plot(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
//! fig[grid[1]].set_title("right");
//! ```
//!
//! Sizes of the figure are in inches; everything inside it is in points.

use crate::color::Palette;
use crate::rc::RcParams;
use crate::units::inches_to_points;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

mod axes;
pub(crate) mod layout;
mod ticks;

pub use axes::{Axes, GridAxis, GridLines, Line, Spine, Spines, TickDirection, TickParams};
pub use layout::{Rect, SubplotParams};
pub use ticks::AxisTicks;

bitflags::bitflags! {
    /// A set of sides of a plot area
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Sides: u8 {
        const TOP = 1 << 0;
        const RIGHT = 1 << 1;
        const BOTTOM = 1 << 2;
        const LEFT = 1 << 3;
    }
}

/// One side of a plot area
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// The corresponding flag
    pub fn flag(self) -> Sides {
        match self {
            Side::Top => Sides::TOP,
            Side::Right => Sides::RIGHT,
            Side::Bottom => Sides::BOTTOM,
            Side::Left => Sides::LEFT,
        }
    }
}

/// A data axis
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Stroke dash style
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    #[serde(rename = "-")]
    Solid,
    #[serde(rename = "--")]
    Dashed,
    #[serde(rename = ":")]
    Dotted,
    #[serde(rename = "-.")]
    DashDot,
}

impl LineStyle {
    /// Dash pattern (on, off, …) in points for a stroke of `width`
    ///
    /// Patterns scale with the stroke width. Returns `None` for solid lines.
    pub fn dash_pattern(self, width: f64) -> Option<SmallVec<[f64; 4]>> {
        let unit: &[f64] = match self {
            LineStyle::Solid => return None,
            LineStyle::Dashed => &[3.7, 1.6],
            LineStyle::Dotted => &[1.0, 1.65],
            LineStyle::DashDot => &[6.4, 1.6, 1.0, 1.6],
        };
        let width = width.max(1.0);
        Some(unit.iter().map(|v| v * width).collect())
    }
}

/// Handle to an [`Axes`] within its [`Figure`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxesId(pub(crate) u32);

impl AxesId {
    /// Get as `usize`
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// The plot areas created for a figure
///
/// A 1×1 layout yields a single handle rather than a one-element grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AxesGrid {
    Single(AxesId),
    /// Row-major grid
    Grid {
        rows: usize,
        cols: usize,
        ids: Vec<AxesId>,
    },
}

impl AxesGrid {
    /// Number of plot areas
    pub fn len(&self) -> usize {
        match self {
            AxesGrid::Single(_) => 1,
            AxesGrid::Grid { ids, .. } => ids.len(),
        }
    }

    /// The single handle of a 1×1 layout
    pub fn single(&self) -> Option<AxesId> {
        match self {
            AxesGrid::Single(id) => Some(*id),
            AxesGrid::Grid { .. } => None,
        }
    }

    /// Get the handle at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<AxesId> {
        match self {
            AxesGrid::Single(id) => (row == 0 && col == 0).then_some(*id),
            AxesGrid::Grid { rows, cols, ids } => {
                (row < *rows && col < *cols).then(|| ids[row * cols + col])
            }
        }
    }

    /// Iterate over handles in row-major order
    pub fn iter(&self) -> impl Iterator<Item = AxesId> + '_ {
        let ids: &[AxesId] = match self {
            AxesGrid::Single(id) => std::slice::from_ref(id),
            AxesGrid::Grid { ids, .. } => ids,
        };
        ids.iter().copied()
    }
}

impl Index<usize> for AxesGrid {
    type Output = AxesId;

    fn index(&self, index: usize) -> &AxesId {
        match self {
            AxesGrid::Single(id) if index == 0 => id,
            AxesGrid::Single(_) => panic!("AxesGrid: index {index} out of range for single axes"),
            AxesGrid::Grid { ids, .. } => &ids[index],
        }
    }
}

/// Axis sharing between plot areas of a grid
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Share {
    #[default]
    None,
    /// All plot areas share the axis
    All,
    /// Plot areas in the same row share the axis
    Row,
    /// Plot areas in the same column share the axis
    Col,
}

impl From<bool> for Share {
    fn from(share: bool) -> Self {
        if share {
            Share::All
        } else {
            Share::None
        }
    }
}

impl Share {
    fn group(self, row: usize, col: usize, index: usize) -> usize {
        match self {
            Share::None => index,
            Share::All => 0,
            Share::Row => row,
            Share::Col => col,
        }
    }
}

/// A drawable canvas containing plot areas
#[derive(Clone, Debug)]
pub struct Figure {
    width: f64,
    height: f64,
    rc: RcParams,
    palette: Palette,
    rows: usize,
    cols: usize,
    axes: Vec<Axes>,
    // Share-group key per axes; equal keys share limits
    x_groups: Vec<(Share, usize)>,
    y_groups: Vec<(Share, usize)>,
    subplot: SubplotParams,
    layout: Option<Vec<Rect>>,
}

impl Figure {
    /// Construct an empty figure with size in inches
    pub fn new(width: f64, height: f64, rc: RcParams) -> Self {
        let palette = Palette::named(&rc.palette).unwrap_or_default();
        Figure {
            width,
            height,
            rc,
            palette,
            rows: 0,
            cols: 0,
            axes: Vec::new(),
            x_groups: Vec::new(),
            y_groups: Vec::new(),
            subplot: SubplotParams::default(),
            layout: None,
        }
    }

    /// Size in inches
    pub fn size_inches(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Size in points
    pub fn size_points(&self) -> (f64, f64) {
        (inches_to_points(self.width), inches_to_points(self.height))
    }

    /// Style parameters this figure was created with
    pub fn rc(&self) -> &RcParams {
        &self.rc
    }

    /// Data color palette
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Grid shape as `(rows, cols)`
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Set the spacing used when no tight layout has been computed
    pub fn set_subplot_params(&mut self, params: SubplotParams) {
        self.subplot = params;
        self.layout = None;
    }

    pub fn subplot_params(&self) -> &SubplotParams {
        &self.subplot
    }

    /// Create a `rows × cols` grid of plot areas
    ///
    /// Replaces any existing plot areas. Inner tick labels are hidden along
    /// shared axes: x labels only on the bottom row of a shared group and y
    /// labels only on the first column. A zero `rows` or `cols` fails with
    /// [`Error::InvalidLayout`] and leaves the figure unchanged.
    pub fn subplots(
        &mut self,
        rows: usize,
        cols: usize,
        sharex: Share,
        sharey: Share,
    ) -> Result<AxesGrid> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidLayout { rows, cols });
        }
        self.rows = rows;
        self.cols = cols;
        self.axes.clear();
        self.x_groups.clear();
        self.y_groups.clear();
        self.layout = None;

        let mut ids = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let index = self.axes.len();
                let mut axes = Axes::new(row, col, self.palette, self.rc.line_width);
                if matches!(sharex, Share::All | Share::Col) && row + 1 < rows {
                    axes.x.show_tick_labels = false;
                }
                if matches!(sharey, Share::All | Share::Row) && col > 0 {
                    axes.y.show_tick_labels = false;
                }
                self.axes.push(axes);
                self.x_groups.push((sharex, sharex.group(row, col, index)));
                self.y_groups.push((sharey, sharey.group(row, col, index)));
                ids.push(AxesId(index as u32));
            }
        }

        Ok(if rows == 1 && cols == 1 {
            AxesGrid::Single(ids[0])
        } else {
            AxesGrid::Grid { rows, cols, ids }
        })
    }

    /// Plot areas in row-major order
    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    /// Mutable access to all plot areas
    pub fn axes_mut(&mut self) -> impl Iterator<Item = &mut Axes> {
        self.axes.iter_mut()
    }

    /// Handles of all plot areas
    pub fn axes_ids(&self) -> impl Iterator<Item = AxesId> {
        (0..self.axes.len() as u32).map(AxesId)
    }

    pub(crate) fn share_peers(&self, id: AxesId, axis: Axis) -> impl Iterator<Item = &Axes> {
        let groups = match axis {
            Axis::X => &self.x_groups,
            Axis::Y => &self.y_groups,
        };
        let key = groups[id.get()];
        groups
            .iter()
            .zip(self.axes.iter())
            .filter(move |(g, _)| **g == key)
            .map(|(_, axes)| axes)
    }

    /// Plot area rectangles in points (origin top-left)
    ///
    /// Uses the tight layout if one has been computed, otherwise the subplot
    /// parameters.
    pub fn axes_rects(&self) -> Vec<Rect> {
        match &self.layout {
            Some(rects) if rects.len() == self.axes.len() => rects.clone(),
            _ => self.grid_rects(),
        }
    }

    pub(crate) fn grid_rects(&self) -> Vec<Rect> {
        let (w, h) = self.size_points();
        self.axes
            .iter()
            .map(|ax| self.subplot.cell(w, h, self.rows, self.cols, ax.row, ax.col))
            .collect()
    }

    /// Whether a tight layout is in effect
    pub fn has_tight_layout(&self) -> bool {
        self.layout.is_some()
    }
}

impl Index<AxesId> for Figure {
    type Output = Axes;

    fn index(&self, id: AxesId) -> &Axes {
        &self.axes[id.get()]
    }
}

impl IndexMut<AxesId> for Figure {
    fn index_mut(&mut self, id: AxesId) -> &mut Axes {
        &mut self.axes[id.get()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grid_shapes() {
        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        let single = fig.subplots(1, 1, Share::None, Share::None).unwrap();
        assert_eq!(single.len(), 1);
        assert!(single.single().is_some());
        assert_eq!(fig.axes().len(), 1);

        let grid = fig.subplots(2, 3, Share::None, Share::None).unwrap();
        assert_eq!(grid.len(), 6);
        assert!(grid.single().is_none());
        assert_eq!(fig.axes().len(), 6);
        assert_eq!(fig[grid.get(1, 2).unwrap()].position(), (1, 2));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.iter().count(), 6);
    }

    #[test]
    fn shared_tick_labels() {
        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        let grid = fig.subplots(2, 2, Share::All, Share::Row).unwrap();
        let show = |r, c| {
            let ax = &fig[grid.get(r, c).unwrap()];
            (ax.shows_xticklabels(), ax.shows_yticklabels())
        };
        assert_eq!(show(0, 0), (false, true));
        assert_eq!(show(0, 1), (false, false));
        assert_eq!(show(1, 0), (true, true));
        assert_eq!(show(1, 1), (true, false));

        let peers = fig.share_peers(grid.get(0, 0).unwrap(), Axis::Y).count();
        assert_eq!(peers, 2);
        let peers = fig.share_peers(grid.get(0, 0).unwrap(), Axis::X).count();
        assert_eq!(peers, 4);
    }

    #[test]
    fn empty_layout_rejected() {
        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        fig.subplots(1, 2, Share::None, Share::None).unwrap();
        assert!(matches!(
            fig.subplots(0, 3, Share::None, Share::None),
            Err(Error::InvalidLayout { rows: 0, cols: 3 })
        ));
        assert!(fig.subplots(2, 0, Share::All, Share::All).is_err());
        assert_eq!(fig.grid_shape(), (1, 2));
        assert_eq!(fig.axes().len(), 2);
    }

    #[test]
    fn share_from_bool() {
        assert_eq!(Share::from(true), Share::All);
        assert_eq!(Share::from(false), Share::None);
    }

    #[test]
    fn dash_patterns_scale() {
        assert!(LineStyle::Solid.dash_pattern(2.0).is_none());
        let p = LineStyle::Dashed.dash_pattern(2.0).unwrap();
        assert_eq!(p.as_slice(), &[7.4, 3.2]);
        let thin = LineStyle::Dotted.dash_pattern(0.5).unwrap();
        assert_eq!(thin.as_slice(), &[1.0, 1.65]);
    }
}
