// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! SVG encoder

use crate::render::{Primitive, Scene, Stroke, Text};
use crate::{Error, Result};
use std::fmt::Write;
use std::path::Path;

pub fn write(scene: &Scene, path: &Path) -> Result<()> {
    std::fs::write(path, to_svg(scene)).map_err(|e| Error::io(path, e))
}

/// Encode `scene` as an SVG document
///
/// Units are points. Text uses the scene's font family by name; fonts are
/// not embedded.
pub fn to_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    // writing to a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}pt" height="{h:.2}pt" viewBox="0 0 {w:.2} {h:.2}" version="1.1">"#,
        w = scene.width,
        h = scene.height,
    );
    let family = escape(&scene.font_family);
    for primitive in &scene.primitives {
        let _ = match primitive {
            Primitive::Rect { rect, fill } => writeln!(
                svg,
                r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{fill}"/>"#,
                rect.x, rect.y, rect.w, rect.h
            ),
            Primitive::Line { points, stroke } => line(&mut svg, points, stroke),
            Primitive::Text(text) => self::text(&mut svg, text, &family),
        };
    }
    svg.push_str("</svg>\n");
    svg
}

fn line(svg: &mut String, points: &[(f64, f64)], stroke: &Stroke) -> std::fmt::Result {
    let mut coords = String::new();
    for (x, y) in points {
        write!(coords, "{x:.2},{y:.2} ")?;
    }
    write!(
        svg,
        r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{:.2}" stroke-linecap="butt""#,
        coords.trim_end(),
        stroke.color,
        stroke.width
    )?;
    if stroke.alpha < 1.0 {
        write!(svg, r#" stroke-opacity="{:.3}""#, stroke.alpha)?;
    }
    if let Some(dash) = &stroke.dash {
        let pattern: Vec<String> = dash.iter().map(|v| format!("{v:.2}")).collect();
        write!(svg, r#" stroke-dasharray="{}""#, pattern.join(","))?;
    }
    writeln!(svg, "/>")
}

fn text(svg: &mut String, text: &Text, family: &str) -> std::fmt::Result {
    let (x, y) = text.origin();
    write!(
        svg,
        r#"  <text x="{x:.2}" y="{y:.2}" font-family="{family}" font-size="{:.2}" fill="{}""#,
        text.size, text.color
    )?;
    if text.rotation != 0.0 {
        write!(svg, r#" transform="rotate({:.2} {x:.2} {y:.2})""#, -text.rotation)?;
    }
    writeln!(svg, ">{}</text>", escape(&text.text))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
