// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Plot area placement

use super::{Axes, Axis, Figure, Side, TickDirection};
use crate::fonts::manager;

/// Pad between a tick and its label, in points
pub(crate) const TICK_LABEL_PAD: f64 = 3.5;
/// Pad between tick labels and an axis label, in points
pub(crate) const LABEL_PAD: f64 = 4.0;
/// Pad between the plot area and its title, in points
pub(crate) const TITLE_PAD: f64 = 6.0;

/// Tight layout padding, as a multiple of the font size
const TIGHT_PAD: f64 = 1.08;
/// Smallest plot area extent the tight layout will produce, in points
const MIN_EXTENT: f64 = 1.0;

/// A rectangle in points, origin at the top-left of the figure
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Smallest rect containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Grow by `pad` on every side
    pub fn expand(&self, pad: f64) -> Rect {
        Rect {
            x: self.x - pad,
            y: self.y - pad,
            w: self.w + 2.0 * pad,
            h: self.h + 2.0 * pad,
        }
    }
}

/// Placement of a grid of plot areas as fractions of the figure size
///
/// `left`, `right`, `bottom` and `top` are edge positions measured from the
/// left and bottom of the figure. `wspace` and `hspace` are the gaps between
/// plot areas as a fraction of the average plot area width and height.
#[derive(Clone, Debug, PartialEq)]
pub struct SubplotParams {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for SubplotParams {
    fn default() -> Self {
        SubplotParams {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
            wspace: 0.2,
            hspace: 0.2,
        }
    }
}

impl SubplotParams {
    /// Rect of the cell at `(row, col)` for a figure of `w × h` points
    pub fn cell(&self, w: f64, h: f64, rows: usize, cols: usize, row: usize, col: usize) -> Rect {
        let (cols_f, rows_f) = (cols as f64, rows as f64);
        let cell_w = (self.right - self.left) * w / (cols_f + self.wspace * (cols_f - 1.0));
        let cell_h = (self.top - self.bottom) * h / (rows_f + self.hspace * (rows_f - 1.0));
        Rect {
            x: self.left * w + col as f64 * cell_w * (1.0 + self.wspace),
            y: (1.0 - self.top) * h + row as f64 * cell_h * (1.0 + self.hspace),
            w: cell_w,
            h: cell_h,
        }
    }
}

/// Space needed by decorations outside a plot area, in points
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Decorations {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Decorations {
    fn max(self, other: Decorations) -> Decorations {
        Decorations {
            left: self.left.max(other.left),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Outward extent of ticks on a side
pub(crate) fn tick_extent(ax: &Axes, side: Side) -> f64 {
    let ticks = &ax.major_ticks;
    if !ticks.sides.contains(side.flag()) {
        return 0.0;
    }
    match ticks.direction {
        TickDirection::In => 0.0,
        TickDirection::Out => ticks.length,
        TickDirection::InOut => ticks.length / 2.0,
    }
}

impl Figure {
    /// Measure decorations of a plot area
    fn decorations(&self, index: usize) -> Decorations {
        let rc = &self.rc;
        let fonts = manager();
        let family = rc.font_family.as_str();
        let ax = &self.axes[index];
        let id = super::AxesId(index as u32);
        let mut deco = Decorations::default();

        deco.left = ax.spines[Side::Left].offset + tick_extent(ax, Side::Left);
        if ax.y.show_tick_labels {
            let widest = self
                .axis_ticks(id, Axis::Y)
                .major
                .iter()
                .map(|(_, label)| fonts.measure_text(family, rc.tick_label_size, label))
                .fold(0.0, f64::max);
            if widest > 0.0 {
                deco.left += TICK_LABEL_PAD + widest;
            }
        }
        if !ax.y.label.is_empty() {
            deco.left += LABEL_PAD + rc.label_size;
        }

        deco.bottom = ax.spines[Side::Bottom].offset + tick_extent(ax, Side::Bottom);
        if ax.x.show_tick_labels {
            let ticks = self.axis_ticks(id, Axis::X);
            if ticks.major.iter().any(|(_, label)| !label.is_empty()) {
                deco.bottom += TICK_LABEL_PAD + rc.tick_label_size;
            }
            // the last label is centred on its tick and may overhang
            if let Some((_, label)) = ticks.major.last() {
                deco.right = fonts.measure_text(family, rc.tick_label_size, label) / 2.0;
            }
        }
        if !ax.x.label.is_empty() {
            deco.bottom += LABEL_PAD + rc.label_size;
        }

        deco.top = ax.spines[Side::Top].offset + tick_extent(ax, Side::Top);
        if !ax.title.is_empty() {
            deco.top += TITLE_PAD + rc.title_size;
        }
        deco
    }

    /// Fit plot areas and their decorations into the figure
    ///
    /// Decorations (tick labels, axis labels, titles, spine offsets and
    /// ticks) are measured with the [`crate::fonts::FontManager`]. Margins
    /// and gaps are uniform across the grid. If the figure is too small to
    /// fit the decorations, plot areas are clamped to a minimal size.
    pub fn tight_layout(&mut self) {
        if self.axes.is_empty() {
            self.layout = None;
            return;
        }

        let deco = (0..self.axes.len())
            .map(|i| self.decorations(i))
            .fold(Decorations::default(), Decorations::max);
        let pad = TIGHT_PAD * self.rc.font_size;
        let (w, h) = self.size_points();
        let (cols, rows) = (self.cols as f64, self.rows as f64);

        let gap_w = deco.left + deco.right + pad;
        let gap_h = deco.top + deco.bottom + pad;
        let avail_w = w - 2.0 * pad - deco.left - deco.right - gap_w * (cols - 1.0);
        let avail_h = h - 2.0 * pad - deco.top - deco.bottom - gap_h * (rows - 1.0);
        let cell_w = (avail_w / cols).max(MIN_EXTENT);
        let cell_h = (avail_h / rows).max(MIN_EXTENT);
        if avail_w / cols < MIN_EXTENT || avail_h / rows < MIN_EXTENT {
            log::debug!("tight_layout: figure too small for decorations; clamping plot areas");
        }

        let rects = self
            .axes
            .iter()
            .map(|ax| Rect {
                x: pad + deco.left + ax.col as f64 * (cell_w + gap_w),
                y: pad + deco.top + ax.row as f64 * (cell_h + gap_h),
                w: cell_w,
                h: cell_h,
            })
            .collect();
        self.layout = Some(rects);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::figure::Share;
    use crate::RcParams;

    #[test]
    fn default_cells() {
        let params = SubplotParams::default();
        let r = params.cell(100.0, 100.0, 1, 1, 0, 0);
        assert!((r.x - 12.5).abs() < 1e-9);
        assert!((r.y - 12.0).abs() < 1e-9);
        assert!((r.w - 77.5).abs() < 1e-9);
        assert!((r.h - 77.0).abs() < 1e-9);

        let a = params.cell(100.0, 100.0, 1, 2, 0, 0);
        let b = params.cell(100.0, 100.0, 1, 2, 0, 1);
        assert!(b.x > a.right());
        assert!((b.right() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn rect_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 15.0, 15.0));
        assert_eq!(a.expand(1.0), Rect::new(-1.0, -1.0, 12.0, 12.0));
    }

    #[test]
    fn tight_layout_fits_figure() {
        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        let grid = fig.subplots(2, 2, Share::None, Share::None).unwrap();
        for id in grid.iter() {
            fig[id].plot(&[0.0, 100.0], &[0.0, 1000.0]).unwrap();
            fig[id].set_xlabel("x");
            fig[id].set_ylabel("y");
            fig[id].set_title("title");
        }
        fig.tight_layout();
        assert!(fig.has_tight_layout());

        let (w, h) = fig.size_points();
        let rects = fig.axes_rects();
        assert_eq!(rects.len(), 4);
        for r in &rects {
            assert!(r.x > 0.0 && r.y > 0.0);
            assert!(r.right() < w && r.bottom() < h);
        }
        // uniform cells without overlap
        assert_eq!(rects[0].w, rects[1].w);
        assert!(rects[0].right() < rects[1].x);
        assert!(rects[0].bottom() < rects[2].y);
    }

    #[test]
    fn tight_layout_clamps_tiny_figure() {
        let mut fig = Figure::new(0.2, 0.2, RcParams::default());
        fig.subplots(1, 1, Share::None, Share::None).unwrap();
        fig.tight_layout();
        let r = fig.axes_rects()[0];
        assert_eq!(r.w, MIN_EXTENT);
        assert_eq!(r.h, MIN_EXTENT);
    }

    #[test]
    fn subplots_reset_layout() {
        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        fig.subplots(1, 1, Share::None, Share::None).unwrap();
        fig.tight_layout();
        fig.subplots(1, 2, Share::None, Share::None).unwrap();
        assert!(!fig.has_tight_layout());
        assert_eq!(fig.axes_rects(), fig.grid_rects());
    }
}
