// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Scene construction
//!
//! A [`Scene`] is a flat list of primitives in points (origin top-left,
//! y downwards) built from a laid-out [`Figure`]. Encoders in
//! [`crate::export`] only ever see scenes.

use crate::color::Color;
use crate::figure::layout::{tick_extent, LABEL_PAD, TICK_LABEL_PAD, TITLE_PAD};
use crate::figure::{Axes, AxesId, Axis, Figure, GridAxis, Rect, Side, TickDirection, TickParams};
use crate::fonts::manager;
use smallvec::SmallVec;

mod geom;
pub use geom::{clip_polyline, clip_segment, dash_polyline, Point};

/// Height above the baseline, as a fraction of the font size
pub const ASCENT: f64 = 0.75;
/// Depth below the baseline, as a fraction of the font size
pub const DESCENT: f64 = 0.25;

/// Stroke parameters
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    /// Width in points
    pub width: f64,
    pub alpha: f64,
    /// Dash pattern in points, `None` for solid
    pub dash: Option<SmallVec<[f64; 4]>>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Stroke {
            color,
            width,
            alpha: 1.0,
            dash: None,
        }
    }
}

/// Horizontal alignment of text relative to its anchor point
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Vertical alignment of text relative to its anchor point
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

/// A single line of text
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// Anchor point
    pub pos: Point,
    pub text: String,
    /// Font size in points
    pub size: f64,
    pub color: Color,
    pub anchor: Anchor,
    pub baseline: Baseline,
    /// Counter-clockwise rotation in degrees about `pos`
    pub rotation: f64,
    /// Measured advance width in points
    pub width: f64,
}

impl Text {
    fn axes(&self) -> (Point, Point) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        // unit vectors along the text and towards its "down" side
        ((cos, -sin), (sin, cos))
    }

    /// Start of the baseline, after alignment and rotation
    pub fn origin(&self) -> Point {
        let along = -self.width
            * match self.anchor {
                Anchor::Start => 0.0,
                Anchor::Middle => 0.5,
                Anchor::End => 1.0,
            };
        let down = self.size
            * match self.baseline {
                Baseline::Top => ASCENT,
                Baseline::Middle => (ASCENT - DESCENT) / 2.0,
                Baseline::Bottom => -DESCENT,
            };
        let (u, v) = self.axes();
        (
            self.pos.0 + along * u.0 + down * v.0,
            self.pos.1 + along * u.1 + down * v.1,
        )
    }

    /// Bounding box of the rotated text
    pub fn bounds(&self) -> Rect {
        let origin = self.origin();
        let (u, v) = self.axes();
        let (up, down) = (-ASCENT * self.size, DESCENT * self.size);
        let corners = [(0.0, up), (self.width, up), (0.0, down), (self.width, down)]
            .map(|(a, d)| (origin.0 + a * u.0 + d * v.0, origin.1 + a * u.1 + d * v.1));
        bounds_of(&corners)
    }
}

/// A drawing primitive
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Filled rectangle
    Rect { rect: Rect, fill: Color },
    /// Open polyline
    Line { points: Vec<Point>, stroke: Stroke },
    Text(Text),
}

impl Primitive {
    fn bounds(&self) -> Option<Rect> {
        match self {
            Primitive::Rect { rect, .. } => Some(*rect),
            Primitive::Line { points, stroke } if !points.is_empty() => {
                Some(bounds_of(points).expand(stroke.width / 2.0))
            }
            Primitive::Line { .. } => None,
            Primitive::Text(text) if !text.text.is_empty() => Some(text.bounds()),
            Primitive::Text(_) => None,
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Primitive::Rect { rect, .. } => {
                rect.x += dx;
                rect.y += dy;
            }
            Primitive::Line { points, .. } => {
                for p in points.iter_mut() {
                    p.0 += dx;
                    p.1 += dy;
                }
            }
            Primitive::Text(text) => {
                text.pos.0 += dx;
                text.pos.1 += dy;
            }
        }
    }
}

fn bounds_of(points: &[Point]) -> Rect {
    let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
    let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        x0 = x0.min(p.0);
        y0 = y0.min(p.1);
        x1 = x1.max(p.0);
        y1 = y1.max(p.1);
    }
    Rect::new(x0, y0, x1 - x0, y1 - y0)
}

/// Page framing of a scene
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Crop to content plus this padding (points); `None` keeps the figure size
    pub tight_pad: Option<f64>,
    pub face_color: Option<Color>,
    pub edge_color: Option<Color>,
}

/// A figure flattened to primitives
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
    pub font_family: String,
    /// Embed the font program in vector output
    pub embed_fonts: bool,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    /// Flatten `figure`
    pub fn build(figure: &Figure, frame: &Frame) -> Scene {
        let (width, height) = figure.size_points();
        let mut builder = Builder {
            figure,
            family: figure.rc().font_family.as_str(),
            out: Vec::new(),
        };
        for (id, rect) in figure.axes_ids().zip(figure.axes_rects()) {
            builder.axes(id, &rect);
        }

        let mut scene = Scene {
            width,
            height,
            font_family: builder.family.to_string(),
            embed_fonts: figure.rc().embed_fonts,
            primitives: builder.out,
        };
        if let Some(pad) = frame.tight_pad {
            scene.crop(pad);
        }
        if let Some(fill) = frame.face_color {
            let rect = Rect::new(0.0, 0.0, scene.width, scene.height);
            scene.primitives.insert(0, Primitive::Rect { rect, fill });
        }
        if let Some(color) = frame.edge_color {
            let (w, h) = (scene.width, scene.height);
            scene.primitives.push(Primitive::Line {
                points: vec![(0.0, 0.0), (w, 0.0), (w, h), (0.0, h), (0.0, 0.0)],
                stroke: Stroke::solid(color, 1.0),
            });
        }
        log::debug!(
            "Scene::build: {} primitives, {:.1}×{:.1} pt",
            scene.primitives.len(),
            scene.width,
            scene.height
        );
        scene
    }

    /// Bounds of all primitives
    pub fn content_bounds(&self) -> Option<Rect> {
        self.primitives
            .iter()
            .filter_map(Primitive::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Shrink to content bounds plus `pad` points
    pub fn crop(&mut self, pad: f64) {
        let Some(bounds) = self.content_bounds() else {
            return;
        };
        let crop = bounds.expand(pad);
        for p in self.primitives.iter_mut() {
            p.translate(-crop.x, -crop.y);
        }
        self.width = crop.w;
        self.height = crop.h;
    }
}

struct Builder<'a> {
    figure: &'a Figure,
    family: &'a str,
    out: Vec<Primitive>,
}

// Maps data values into a plot area
struct Transform {
    rect: Rect,
    x: (f64, f64),
    y: (f64, f64),
}

impl Transform {
    fn x(&self, v: f64) -> f64 {
        let (lo, hi) = self.x;
        self.rect.x + (v - lo) / (hi - lo) * self.rect.w
    }

    fn y(&self, v: f64) -> f64 {
        let (lo, hi) = self.y;
        self.rect.bottom() - (v - lo) / (hi - lo) * self.rect.h
    }
}

fn in_range(v: f64, (lo, hi): (f64, f64)) -> bool {
    let eps = (hi - lo).abs() * 1e-9;
    v >= lo.min(hi) - eps && v <= lo.max(hi) + eps
}

impl<'a> Builder<'a> {
    fn text(
        &mut self,
        pos: Point,
        text: &str,
        size: f64,
        anchor: Anchor,
        baseline: Baseline,
        rotation: f64,
    ) {
        if text.is_empty() {
            return;
        }
        let width = manager().measure_text(self.family, size, text);
        self.out.push(Primitive::Text(Text {
            pos,
            text: text.to_string(),
            size,
            color: Color::BLACK,
            anchor,
            baseline,
            rotation,
            width,
        }));
    }

    fn line(&mut self, points: Vec<Point>, stroke: Stroke) {
        self.out.push(Primitive::Line { points, stroke });
    }

    fn axes(&mut self, id: AxesId, rect: &Rect) {
        let figure = self.figure;
        let ax = &figure[id];
        let rc = figure.rc();
        let xt = figure.axis_ticks(id, Axis::X);
        let yt = figure.axis_ticks(id, Axis::Y);
        let tf = Transform {
            rect: *rect,
            x: xt.limits,
            y: yt.limits,
        };
        let degenerate = !(tf.x.0 != tf.x.1 && tf.y.0 != tf.y.1);

        // grid behind data
        if let Some(grid) = ax.grid().filter(|_| !degenerate) {
            let stroke = Stroke {
                color: grid.color,
                width: grid.width,
                alpha: grid.alpha,
                dash: grid.style.dash_pattern(grid.width),
            };
            if matches!(grid.axis, GridAxis::X | GridAxis::Both) {
                for (v, _) in xt.major.iter().filter(|(v, _)| in_range(*v, xt.limits)) {
                    let x = tf.x(*v);
                    self.line(vec![(x, rect.y), (x, rect.bottom())], stroke.clone());
                }
            }
            if matches!(grid.axis, GridAxis::Y | GridAxis::Both) {
                for (v, _) in yt.major.iter().filter(|(v, _)| in_range(*v, yt.limits)) {
                    let y = tf.y(*v);
                    self.line(vec![(rect.x, y), (rect.right(), y)], stroke.clone());
                }
            }
        }

        if !degenerate {
            for line in ax.lines() {
                let points: Vec<Point> = line
                    .xs
                    .iter()
                    .zip(line.ys.iter())
                    .map(|(x, y)| (tf.x(*x), tf.y(*y)))
                    .collect();
                let stroke = Stroke {
                    color: line.color,
                    width: line.width,
                    alpha: 1.0,
                    dash: line.style.dash_pattern(line.width),
                };
                for part in clip_polyline(&points, rect) {
                    self.line(part, stroke.clone());
                }
            }
        }

        // spines: Left and Right are vertical at x, Top and Bottom horizontal at y
        for (side, spine) in ax.spines.iter().filter(|(_, s)| s.visible) {
            let stroke = Stroke::solid(spine.color, spine.width);
            let points = match side {
                Side::Left => {
                    let x = rect.x - spine.offset;
                    vec![(x, rect.y), (x, rect.bottom())]
                }
                Side::Right => {
                    let x = rect.right() + spine.offset;
                    vec![(x, rect.y), (x, rect.bottom())]
                }
                Side::Top => {
                    let y = rect.y - spine.offset;
                    vec![(rect.x, y), (rect.right(), y)]
                }
                Side::Bottom => {
                    let y = rect.bottom() + spine.offset;
                    vec![(rect.x, y), (rect.right(), y)]
                }
            };
            self.line(points, stroke);
        }

        if degenerate {
            return;
        }

        let major_x: SmallVec<[f64; 16]> =
            xt.major.iter().map(|(v, _)| *v).filter(|v| in_range(*v, xt.limits)).collect();
        let major_y: SmallVec<[f64; 16]> =
            yt.major.iter().map(|(v, _)| *v).filter(|v| in_range(*v, yt.limits)).collect();
        self.ticks(ax, rect, &ax.major_ticks, &major_x, &major_y, &tf);
        if ax.minor_visible {
            let minor_x: SmallVec<[f64; 16]> = xt.minor.iter().copied().collect();
            let minor_y: SmallVec<[f64; 16]> = yt.minor.iter().copied().collect();
            self.ticks(ax, rect, &ax.minor_ticks, &minor_x, &minor_y, &tf);
        }

        // tick labels, axis labels and title
        let left = rect.x
            - ax.spines[Side::Left].offset
            - tick_extent(ax, Side::Left)
            - TICK_LABEL_PAD;
        let mut label_x = left;
        if ax.shows_yticklabels() {
            for (v, label) in yt.major.iter().filter(|(v, _)| in_range(*v, yt.limits)) {
                let pos = (left, tf.y(*v));
                self.text(pos, label, rc.tick_label_size, Anchor::End, Baseline::Middle, 0.0);
                let w = manager().measure_text(self.family, rc.tick_label_size, label);
                label_x = label_x.min(left - w);
            }
        }

        let top = rect.bottom()
            + ax.spines[Side::Bottom].offset
            + tick_extent(ax, Side::Bottom)
            + TICK_LABEL_PAD;
        let mut label_y = top;
        if ax.shows_xticklabels() {
            for (v, label) in xt.major.iter().filter(|(v, _)| in_range(*v, xt.limits)) {
                self.text(
                    (tf.x(*v), top),
                    label,
                    rc.tick_label_size,
                    Anchor::Middle,
                    Baseline::Top,
                    0.0,
                );
                if !label.is_empty() {
                    label_y = top + rc.tick_label_size;
                }
            }
        }

        let centre = (rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
        self.text(
            (centre.0, label_y + LABEL_PAD),
            ax.xlabel(),
            rc.label_size,
            Anchor::Middle,
            Baseline::Top,
            0.0,
        );
        self.text(
            (label_x - LABEL_PAD, centre.1),
            ax.ylabel(),
            rc.label_size,
            Anchor::Middle,
            Baseline::Bottom,
            90.0,
        );
        let title_y =
            rect.y - ax.spines[Side::Top].offset - tick_extent(ax, Side::Top) - TITLE_PAD;
        self.text(
            (centre.0, title_y),
            ax.title(),
            rc.title_size,
            Anchor::Middle,
            Baseline::Bottom,
            0.0,
        );
    }

    fn ticks(
        &mut self,
        ax: &Axes,
        rect: &Rect,
        params: &TickParams,
        xs: &[f64],
        ys: &[f64],
        tf: &Transform,
    ) {
        let (outer, inner) = match params.direction {
            TickDirection::In => (0.0, params.length),
            TickDirection::Out => (params.length, 0.0),
            TickDirection::InOut => (params.length / 2.0, params.length / 2.0),
        };
        let stroke = Stroke::solid(params.color, params.width);
        for side in Side::ALL {
            if !params.sides.contains(side.flag()) {
                continue;
            }
            let offset = ax.spines[side].offset;
            match side {
                Side::Bottom | Side::Top => {
                    let (y, sign) = match side {
                        Side::Bottom => (rect.bottom() + offset, 1.0),
                        _ => (rect.y - offset, -1.0),
                    };
                    for v in xs {
                        let x = tf.x(*v);
                        let tick = vec![(x, y - sign * inner), (x, y + sign * outer)];
                        self.line(tick, stroke.clone());
                    }
                }
                Side::Left | Side::Right => {
                    let (x, sign) = match side {
                        Side::Left => (rect.x - offset, -1.0),
                        _ => (rect.right() + offset, 1.0),
                    };
                    for v in ys {
                        let y = tf.y(*v);
                        let tick = vec![(x - sign * inner, y), (x + sign * outer, y)];
                        self.line(tick, stroke.clone());
                    }
                }
            }
        }
    }
}
