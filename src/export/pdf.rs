// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! PDF encoder

use crate::color::Color;
use crate::fonts::manager;
use crate::render::{dash_polyline, Primitive, Scene, Text};
use crate::{Error, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Pt, TextMatrix,
};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

fn mm(pt: f64) -> Mm {
    Mm::from(Pt(pt as f32))
}

fn pdf_color(color: Color) -> printpdf::Color {
    let [r, g, b] = color.to_f32();
    printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

// Scene coordinates have y down; PDF has y up
struct Page {
    height: f64,
    background: Color,
}

impl Page {
    fn point(&self, (x, y): (f64, f64)) -> Point {
        Point::new(mm(x), mm(self.height - y))
    }
}

/// Family used to measure text set in the built-in Helvetica
const BUILTIN_FAMILY: &str = "Helvetica";

/// Select the font used for all text
///
/// The scene's family is embedded if font embedding is enabled and the font
/// manager holds its data; otherwise the built-in Helvetica is used. The
/// flag is true for the built-in font.
fn load_font(
    doc: &PdfDocumentReference,
    scene: &Scene,
    path: &Path,
) -> Result<(IndirectFontRef, bool)> {
    if scene.embed_fonts {
        if let Some(data) = manager().face_data(&scene.font_family) {
            match doc.add_external_font(Cursor::new(data)) {
                Ok(font) => return Ok((font, false)),
                Err(err) => log::warn!(
                    "pdf::write: cannot embed '{}' ({err}); using Helvetica",
                    scene.font_family
                ),
            }
        } else {
            log::debug!("pdf::write: no face data for '{}'; using Helvetica", scene.font_family);
        }
    }
    doc.add_builtin_font(BuiltinFont::Helvetica)
        .map(|font| (font, true))
        .map_err(|e| Error::render(path, e))
}

/// Baseline origin of `text` as drawn with the selected font
///
/// Scene text is measured with the scene's family. With the built-in font
/// the width is measured again (Helvetica, else the generic sans-serif face)
/// so that centred and end-anchored text stays aligned.
fn text_origin(text: &Text, builtin: bool) -> (f64, f64) {
    if !builtin {
        return text.origin();
    }
    let width = manager().measure_text(BUILTIN_FAMILY, text.size, &text.text);
    Text {
        width,
        ..text.clone()
    }
    .origin()
}

/// Write `scene` as a single-page PDF
///
/// Stroke opacity is approximated by blending with the page background.
pub fn write(scene: &Scene, path: &Path) -> Result<()> {
    let (doc, page, layer) = PdfDocument::new(
        "figure",
        mm(scene.width),
        mm(scene.height),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let (font, builtin) = load_font(&doc, scene, path)?;

    let background = scene
        .primitives
        .first()
        .and_then(|p| match p {
            Primitive::Rect { fill, .. } => Some(*fill),
            _ => None,
        })
        .unwrap_or(Color::WHITE);
    let page = Page {
        height: scene.height,
        background,
    };

    for primitive in &scene.primitives {
        match primitive {
            Primitive::Rect { rect, fill } => {
                let ring = [
                    (rect.x, rect.y),
                    (rect.right(), rect.y),
                    (rect.right(), rect.bottom()),
                    (rect.x, rect.bottom()),
                ]
                .map(|p| (page.point(p), false))
                .to_vec();
                layer.set_fill_color(pdf_color(*fill));
                layer.add_polygon(Polygon {
                    rings: vec![ring],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
            Primitive::Line { points, stroke } => {
                let color = if stroke.alpha < 1.0 {
                    stroke.color.blend_over(page.background, stroke.alpha)
                } else {
                    stroke.color
                };
                layer.set_outline_color(pdf_color(color));
                layer.set_outline_thickness(stroke.width as f32);
                let parts = match &stroke.dash {
                    Some(dash) => dash_polyline(points, dash),
                    None => vec![points.clone()],
                };
                for part in parts {
                    stroke_path(&layer, &page, &part);
                }
            }
            Primitive::Text(text) => {
                let (x, y) = text_origin(text, builtin);
                layer.set_fill_color(pdf_color(text.color));
                layer.begin_text_section();
                layer.set_font(&font, text.size as f32);
                layer.set_text_matrix(TextMatrix::TranslateRotate(
                    Pt(x as f32),
                    Pt((page.height - y) as f32),
                    text.rotation as f32,
                ));
                layer.write_text(text.text.clone(), &font);
                layer.end_text_section();
            }
        }
    }

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| Error::render(path, e))
}

fn stroke_path(layer: &PdfLayerReference, page: &Page, points: &[(f64, f64)]) {
    if points.len() < 2 {
        return;
    }
    layer.add_line(Line {
        points: points.iter().map(|p| (page.point(*p), false)).collect(),
        is_closed: false,
    });
}
