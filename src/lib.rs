// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Publication-style figures
//!
//! This library derives font and size parameters from a [`PlotConfig`]
//! (optionally a journal [`Preset`]), creates figures with grids of plot
//! areas sized in centimeters or inches, applies a consistent publication
//! finish (despined axes, offset spines, light gridlines, outward ticks) and
//! writes SVG, PNG or PDF files.
//!
//! ```no_run
//! use pubplot::{FigureOptions, PlotConfig, Plotting, SaveOptions, Unit};
//!
//! # fn main() -> pubplot::Result<()> {
//! let plotting = Plotting::new(PlotConfig::default());
//! let options = FigureOptions::grid(1, 2).size(10.0, 10.0, Unit::Centimeter);
//! let (mut plot, axes) = plotting.create_figure(options)?;
//! for id in axes.iter() {
//!     plot[id].plot(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0])?;
//! }
//! plot.save("figure.pdf", Some(std::path::Path::new("out")), true, &SaveOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! Fonts are managed by a process-wide [`fonts::FontManager`] which loads
//! system fonts plus custom fonts from a directory (see
//! [`fonts::fonts_dir`]). This library logs through the [`log`] facade.

#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod error;
pub use error::{Error, Result};

pub mod color;
pub mod config;
pub mod export;
pub mod figure;
pub mod fonts;
pub mod plot;
pub mod plotting;
pub mod rc;
pub mod render;
pub mod style;
pub mod units;

pub use color::{Color, Palette};
pub use config::{FontSizes, PlotConfig, Preset};
pub use plot::{BBox, Format, Plot, SaveOptions};
pub use plotting::{FigureOptions, Plotting};
pub use rc::{RcOverrides, RcParams};
pub use style::{apply_style, StyleParams};
pub use units::{to_engine_units, Unit};
