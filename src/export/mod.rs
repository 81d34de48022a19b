// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! File encoders
//!
//! SVG is always available. PNG requires the `png` feature (via `plotters`)
//! and PDF the `pdf` feature (via `printpdf`).

use crate::plot::Format;
use crate::render::Scene;
use crate::Result;
use std::path::Path;

mod svg;
pub use svg::to_svg;

cfg_if::cfg_if! {
    if #[cfg(feature = "png")] {
        mod png;
        use png::write as write_png;
    } else {
        fn write_png(_: &Scene, _: u32, _: &Path) -> Result<()> {
            Err(crate::Error::UnsupportedFormat("png (built without feature \"png\")".to_string()))
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "pdf")] {
        mod pdf;
        use pdf::write as write_pdf;
    } else {
        fn write_pdf(_: &Scene, _: &Path) -> Result<()> {
            Err(crate::Error::UnsupportedFormat("pdf (built without feature \"pdf\")".to_string()))
        }
    }
}

/// Encode `scene` to `path`
///
/// `dpi` only affects raster formats.
pub fn write(scene: &Scene, format: Format, dpi: u32, path: &Path) -> Result<()> {
    log::debug!("export::write: {:?} to {}", format, path.display());
    match format {
        Format::Svg => svg::write(scene, path),
        Format::Png => write_png(scene, dpi, path),
        Format::Pdf => write_pdf(scene, path),
    }
}
