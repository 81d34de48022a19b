// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! PNG encoder

use crate::color::Color;
use crate::fonts::{manager, FALLBACK_FAMILY};
use crate::render::{dash_polyline, Point, Primitive, Scene, Text, ASCENT};
use crate::units::POINTS_PER_INCH;
use crate::{Error, Result};
use easy_cast::*;
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

// Families registered with the plotters font table
static REGISTERED: Mutex<BTreeSet<String>> = Mutex::new(BTreeSet::new());

/// Make `family` available to plotters' text renderer
///
/// Face data is taken from the font manager (falling back to
/// [`FALLBACK_FAMILY`]) and registered once per process.
fn register_family(family: &str) -> bool {
    let mut registered = REGISTERED.lock().unwrap_or_else(|e| e.into_inner());
    if registered.contains(family) {
        return true;
    }
    let fonts = manager();
    let Some(data) = fonts
        .face_data(family)
        .or_else(|| fonts.face_data(FALLBACK_FAMILY))
    else {
        return false;
    };
    // the font table requires 'static data
    let data: &'static [u8] = Box::leak(data.into_boxed_slice());
    match plotters::style::register_font(family, plotters::style::FontStyle::Normal, data) {
        Ok(()) => {
            registered.insert(family.to_string());
            true
        }
        Err(_) => {
            log::warn!("png: failed to register font '{family}': invalid font data");
            false
        }
    }
}

fn rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn px(v: f64) -> i32 {
    v.clamp(-1e6, 1e6).cast_nearest()
}

/// Rasterize `scene` at `dpi` and write a PNG file
///
/// PNG output is always opaque: a missing background is drawn white. Text
/// is drawn with the face the font manager holds for the scene's family;
/// if there is none, or drawing fails, text is skipped with a warning.
pub fn write(scene: &Scene, dpi: u32, path: &Path) -> Result<()> {
    let scale = f64::from(dpi) / POINTS_PER_INCH;
    let size = |v: f64| -> Result<u32> {
        let v: u32 = (v * scale)
            .try_cast_ceil()
            .map_err(|_| Error::render(path, format!("invalid image size {v}pt at {dpi} dpi")))?;
        Ok(v.max(1))
    };
    let dims = (size(scene.width)?, size(scene.height)?);
    log::debug!("png::write: {}×{} px", dims.0, dims.1);

    let root = BitMapBackend::new(path, dims).into_drawing_area();
    root.fill(&WHITE).map_err(|e| Error::render(path, e))?;

    let map = |p: &Point| (px(p.0 * scale), px(p.1 * scale));
    let has_text = scene.primitives.iter().any(|p| matches!(p, Primitive::Text(_)));
    let mut text_ok = has_text && register_family(&scene.font_family);
    if has_text && !text_ok {
        log::warn!(
            "png::write: no face for '{}'; text omitted",
            scene.font_family
        );
    }
    for primitive in &scene.primitives {
        match primitive {
            Primitive::Rect { rect, fill } => {
                let corners = [map(&(rect.x, rect.y)), map(&(rect.right(), rect.bottom()))];
                root.draw(&Rectangle::new(corners, rgb(*fill).filled()))
                    .map_err(|e| Error::render(path, e))?;
            }
            Primitive::Line { points, stroke } => {
                let width: u32 = (stroke.width * scale).max(1.0).cast_nearest();
                let style = rgb(stroke.color).mix(stroke.alpha).stroke_width(width);
                let parts = match &stroke.dash {
                    Some(dash) => dash_polyline(points, dash),
                    None => vec![points.clone()],
                };
                for part in parts {
                    let coords: Vec<(i32, i32)> = part.iter().map(map).collect();
                    root.draw(&PathElement::new(coords, style))
                        .map_err(|e| Error::render(path, e))?;
                }
            }
            Primitive::Text(text) if text_ok => {
                if let Err(err) = draw_text(&root, text, &scene.font_family, scale) {
                    log::warn!("png::write: skipping text ({err})");
                    text_ok = false;
                }
            }
            Primitive::Text(_) => (),
        }
    }

    root.present().map_err(|e| Error::render(path, e))
}

fn draw_text(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    text: &Text,
    family: &str,
    scale: f64,
) -> std::result::Result<(), String> {
    let transform = match text.rotation.rem_euclid(360.0).round() as i32 {
        0 => FontTransform::None,
        90 => FontTransform::Rotate270,
        180 => FontTransform::Rotate180,
        270 => FontTransform::Rotate90,
        other => return Err(format!("unsupported rotation {other}°")),
    };
    // top-left corner of the unrotated text box, moved with the rotation
    let (ox, oy) = text.origin();
    let (sin, cos) = text.rotation.to_radians().sin_cos();
    let up = ASCENT * text.size;
    let corner = (ox - up * sin, oy - up * cos);

    let style = (family, text.size * scale)
        .into_font()
        .transform(transform)
        .color(&rgb(text.color))
        .pos(Pos::new(HPos::Left, VPos::Top));
    root.draw_text(
        &text.text,
        &style,
        (px(corner.0 * scale), px(corner.1 * scale)),
    )
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::figure::Rect;
    use crate::render::Stroke;

    #[test]
    fn writes_png() {
        let scene = Scene {
            width: 72.0,
            height: 36.0,
            font_family: "sans-serif".to_string(),
            embed_fonts: false,
            primitives: vec![
                Primitive::Rect {
                    rect: Rect::new(0.0, 0.0, 72.0, 36.0),
                    fill: Color::WHITE,
                },
                Primitive::Line {
                    points: vec![(0.0, 0.0), (72.0, 36.0)],
                    stroke: Stroke::solid(Color::BLACK, 1.0),
                },
            ],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write(&scene, 144, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn translucent_dashes_and_text() {
        let scene = Scene {
            width: 144.0,
            height: 72.0,
            font_family: "NonexistentFontXYZ".to_string(),
            embed_fonts: false,
            primitives: vec![
                Primitive::Line {
                    points: vec![(10.0, 36.0), (134.0, 36.0)],
                    stroke: Stroke {
                        alpha: 0.7,
                        dash: crate::figure::LineStyle::Dashed.dash_pattern(0.8),
                        ..Stroke::solid(Color::rgb(0x8C, 0x8C, 0x8C), 0.8)
                    },
                },
                Primitive::Text(Text {
                    pos: (72.0, 10.0),
                    text: "title".to_string(),
                    size: 12.0,
                    color: Color::BLACK,
                    anchor: crate::render::Anchor::Middle,
                    baseline: crate::render::Baseline::Top,
                    rotation: 90.0,
                    width: 30.0,
                }),
            ],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashed.png");
        // text without a usable face is skipped, never an error
        write(&scene, 100, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
