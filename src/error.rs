// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by this library
///
/// Input-validation errors are raised before any state is modified. Degraded
/// but recoverable conditions (e.g. a missing font) are not errors; see
/// [`crate::fonts::FontWarning`].
#[derive(Error, Debug)]
pub enum Error {
    /// A length unit other than `cm` or `inch`
    #[error("unit must be 'cm' or 'inch', got '{0}'")]
    InvalidUnit(String),
    /// Zero rows or columns requested
    #[error("invalid subplot layout: {rows} rows × {cols} columns")]
    InvalidLayout { rows: usize, cols: usize },
    /// Non-positive or non-finite figure size
    #[error("invalid figure dimensions: {width} × {height}")]
    InvalidDimensions { width: f64, height: f64 },
    /// Key not recognised by [`crate::PlotConfig::update`]
    #[error("unknown configuration parameter: {0}")]
    UnknownParameter(String),
    /// Unrecognised journal preset
    #[error("journal '{name}' not available; available presets: {available}")]
    UnknownPreset { name: String, available: String },
    /// Configuration document or value is invalid
    #[error("malformed configuration: {0}")]
    MalformedConfig(String),
    /// Data series with differing x and y lengths
    #[error("x and y must have the same length, got {x} and {y}")]
    LengthMismatch { x: usize, y: usize },
    /// File extension with no matching encoder
    #[error("unsupported output format '{0}'")]
    UnsupportedFormat(String),
    /// File system failure
    #[error("I/O failure on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Encoder failure while writing a figure
    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn render(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Render {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedConfig(err.to_string())
    }
}

/// Result type used throughout this library
pub type Result<T> = std::result::Result<T, Error>;
