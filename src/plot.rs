// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Styled figures and saving

use crate::color::Color;
use crate::figure::Figure;
use crate::render::{Frame, Scene};
use crate::style::{apply_style, StyleParams};
use crate::units::POINTS_PER_INCH;
use crate::{export, Error, Result};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// Output file format
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Svg,
    Png,
    Pdf,
}

impl Format {
    /// File extension
    pub fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
            Format::Pdf => "pdf",
        }
    }

    /// Determine the format of `path` from its extension
    ///
    /// A path without extension gets `.png` appended.
    pub fn from_path(path: &Path) -> Result<(PathBuf, Format)> {
        let Some(ext) = path.extension() else {
            let mut name = path.as_os_str().to_owned();
            name.push(".png");
            return Ok((PathBuf::from(name), Format::Png));
        };
        let format = match ext.to_string_lossy().to_ascii_lowercase().as_str() {
            "svg" => Format::Svg,
            "png" => Format::Png,
            "pdf" => Format::Pdf,
            other => return Err(Error::UnsupportedFormat(other.to_string())),
        };
        Ok((path.to_path_buf(), format))
    }
}

/// Bounding box mode
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum BBox {
    /// Crop to the drawn content plus padding (inches)
    Tight { pad_inches: f64 },
    /// Keep the figure size
    #[default]
    Standard,
}

/// Options of [`Plot::save`]
#[derive(Clone, Debug, PartialEq)]
pub struct SaveOptions {
    pub bbox: BBox,
    /// Raster resolution (ignored by vector formats)
    pub dpi: u32,
    /// Background; `None` for transparent
    pub face_color: Option<Color>,
    /// Frame around the output; `None` for no frame
    pub edge_color: Option<Color>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions {
            bbox: BBox::Tight { pad_inches: 0.1 },
            dpi: 300,
            face_color: Some(Color::WHITE),
            edge_color: None,
        }
    }
}

impl SaveOptions {
    fn frame(&self) -> Frame {
        Frame {
            tight_pad: match self.bbox {
                BBox::Tight { pad_inches } => Some(pad_inches * POINTS_PER_INCH),
                BBox::Standard => None,
            },
            face_color: self.face_color,
            edge_color: self.edge_color,
        }
    }
}

/// A figure with publication styling
///
/// Derefs to [`Figure`], so plot areas are accessed directly:
/// `plot[id].plot(&xs, &ys)`.
#[derive(Clone, Debug)]
pub struct Plot {
    figure: Figure,
    pub(crate) style_applied: bool,
    default_style: StyleParams,
}

impl Plot {
    /// Wrap a figure (unstyled)
    pub fn new(figure: Figure) -> Self {
        Self::with_style(figure, StyleParams::default())
    }

    /// Wrap a figure, using `style` whenever a default style is needed
    pub fn with_style(figure: Figure, style: StyleParams) -> Self {
        Plot {
            figure,
            style_applied: false,
            default_style: style,
        }
    }

    /// Whether [`apply_style`] has been called
    pub fn style_applied(&self) -> bool {
        self.style_applied
    }

    /// Style parameters used by [`Self::save`] with `ensure_style`
    pub fn default_style(&self) -> &StyleParams {
        &self.default_style
    }

    /// Apply `params` to this plot; see [`apply_style`]
    pub fn apply_style(&mut self, params: &StyleParams) -> Result<&mut Self> {
        apply_style(self, params)
    }

    /// Unwrap the figure
    pub fn into_figure(self) -> Figure {
        self.figure
    }

    /// Flatten to a scene with `options` framing
    pub fn scene(&self, options: &SaveOptions) -> Scene {
        Scene::build(&self.figure, &options.frame())
    }

    /// Write the figure to `dir/filename`
    ///
    /// The format is chosen from the file extension ([`Format::from_path`]).
    /// If `ensure_style` is true and no style has been applied, the default
    /// style is applied first. `dir` defaults to the current directory and is
    /// created (with parents) if missing. Returns the path written.
    pub fn save(
        &mut self,
        filename: impl AsRef<Path>,
        dir: Option<&Path>,
        ensure_style: bool,
        options: &SaveOptions,
    ) -> Result<PathBuf> {
        let (filename, format) = Format::from_path(filename.as_ref())?;

        if ensure_style && !self.style_applied {
            let params = self.default_style.clone();
            apply_style(self, &params)?;
        }

        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(|e| Error::io(".", e))?,
        };
        std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        let path = dir.join(filename);

        let scene = self.scene(options);
        export::write(&scene, format, options.dpi, &path)?;
        log::info!("Figure saved to: {}", path.display());
        Ok(path)
    }
}

impl Deref for Plot {
    type Target = Figure;

    fn deref(&self) -> &Figure {
        &self.figure
    }
}

impl DerefMut for Plot {
    fn deref_mut(&mut self) -> &mut Figure {
        &mut self.figure
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::figure::{Share, Side};
    use crate::RcParams;

    fn plot() -> Plot {
        let mut fig = Figure::new(3.0, 2.0, RcParams::default());
        let id = fig.subplots(1, 1, Share::None, Share::None).unwrap()[0];
        fig[id].plot(&[0.0, 1.0], &[1.0, 0.0]).unwrap();
        Plot::new(fig)
    }

    #[test]
    fn formats() {
        let (p, f) = Format::from_path(Path::new("a/fig.PDF")).unwrap();
        assert_eq!((p, f), (PathBuf::from("a/fig.PDF"), Format::Pdf));
        let (p, f) = Format::from_path(Path::new("fig")).unwrap();
        assert_eq!((p, f), (PathBuf::from("fig.png"), Format::Png));
        assert!(matches!(
            Format::from_path(Path::new("fig.bmp")),
            Err(Error::UnsupportedFormat(ext)) if ext == "bmp"
        ));
    }

    #[test]
    fn save_applies_style_and_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/out");
        let mut plot = plot();
        let path = plot
            .save("figure.svg", Some(&dir), true, &SaveOptions::default())
            .unwrap();
        assert_eq!(path, dir.join("figure.svg"));
        assert!(plot.style_applied());
        assert!(!plot.axes()[0].spines[Side::Top].visible);
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn save_without_style() {
        let tmp = tempfile::tempdir().unwrap();
        let mut plot = plot();
        plot.save("raw.svg", Some(tmp.path()), false, &SaveOptions::default())
            .unwrap();
        assert!(!plot.style_applied());
        assert!(plot.axes()[0].spines[Side::Top].visible);
    }

    #[test]
    fn unsupported_format_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("never");
        let mut plot = plot();
        let err = plot
            .save("figure.xyz", Some(&dir), true, &SaveOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert!(!dir.exists());
        assert!(!plot.style_applied());
    }

    #[test]
    fn standard_bbox_keeps_size() {
        let plot = plot();
        let options = SaveOptions {
            bbox: BBox::Standard,
            ..Default::default()
        };
        let scene = plot.scene(&options);
        assert_eq!((scene.width, scene.height), (216.0, 144.0));
    }
}
