// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font registration and lookup
//!
//! Fonts are managed by the [`FontManager`], of which a static singleton
//! exists and can be accessed via [`manager()`]. The manager holds a
//! [`fontdb::Database`] with the system fonts plus any custom fonts found in
//! the font directory. Loading happens once per process; later calls to
//! [`FontManager::load_fonts`] do nothing.
//!
//! Problems while loading fonts never fail an operation. They are reported
//! as [`FontWarning`]s: logged, kept for inspection via
//! [`FontManager::warnings`], and a fallback font is used instead.
//!
//! ### Font sizes
//!
//! All font sizes are given in points (1/72 inch). Text extents returned by
//! [`FontManager::measure_text`] are in points too.

use std::path::{Path, PathBuf};
use thiserror::Error;

mod families;
mod manager;

pub use manager::{manager, FontManager};

/// Environment variable overriding the default font directory
pub const FONT_DIR_ENV: &str = "PUBPLOT_FONT_DIR";

/// Family used when a requested family is unavailable
pub const FALLBACK_FAMILY: &str = "DejaVu Sans";

/// File extensions recognised as font files (compared case-insensitively)
pub const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "woff", "woff2"];

/// Non-fatal font problems
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontWarning {
    #[error("font directory {} not found; using system fonts only", .0.display())]
    DirectoryMissing(PathBuf),
    #[error("error reading font directory {}: {message}", path.display())]
    DirectoryUnreadable { path: PathBuf, message: String },
    #[error("no font files found in {}", .0.display())]
    NoFontFiles(PathBuf),
    #[error("failed to load font {}: {message}", path.display())]
    LoadFailed { path: PathBuf, message: String },
    #[error("font '{requested}' not available; using '{fallback}'")]
    FamilyUnavailable { requested: String, fallback: String },
}

/// The default font directory
///
/// This is the value of `PUBPLOT_FONT_DIR` if set, otherwise the `fonts`
/// directory of this package.
pub fn fonts_dir() -> PathBuf {
    match std::env::var_os(FONT_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts"),
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
        .unwrap_or(false)
}

/// List font files in `dir` by file stem, sorted
///
/// Returns an empty list if `dir` does not exist or cannot be read. This does
/// not load anything.
pub fn list_font_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };
    let mut stems: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_font_file(path))
        .filter_map(|path| Some(path.file_stem()?.to_string_lossy().into_owned()))
        .collect();
    stems.sort();
    stems
}
