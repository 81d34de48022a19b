// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font manager

use super::{families, fonts_dir, is_font_file, FontWarning};
use fontdb::{Database, Family, Query};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock, RwLockReadGuard};
use ttf_parser::{name_id, Face};

/// Advance width per character, in em, used when no face is available
const FALLBACK_ADVANCE: f64 = 0.55;

struct FontState {
    loaded: bool,
    db: Database,
    // Family names and file stems of fonts registered from the font directory
    custom: BTreeSet<String>,
    warnings: Vec<FontWarning>,
}

/// Registry of available fonts
///
/// This is the type of the global singleton accessible via the [`manager()`]
/// function. Thread-safety is handled via an internal lock.
pub struct FontManager {
    state: RwLock<FontState>,
    system_fonts: bool,
}

impl FontManager {
    /// Construct a manager which will load system fonts on first use
    pub fn new() -> Self {
        Self::with_system_fonts(true)
    }

    pub(crate) fn with_system_fonts(system_fonts: bool) -> Self {
        FontManager {
            state: RwLock::new(FontState {
                loaded: false,
                db: Database::new(),
                custom: BTreeSet::new(),
                warnings: Vec::new(),
            }),
            system_fonts,
        }
    }

    /// True once [`Self::load_fonts`] has run
    pub fn is_loaded(&self) -> bool {
        self.state.read().unwrap().loaded
    }

    /// Load system fonts and custom fonts from `dir`
    ///
    /// If `dir` is `None`, [`super::fonts_dir()`] is used. Only the first call
    /// does anything. Failures are recorded as warnings; after this call the
    /// manager is always marked as loaded.
    pub fn load_fonts(&self, dir: Option<&Path>) {
        let mut state = self.state.write().unwrap();
        if state.loaded {
            return;
        }
        state.loaded = true;

        if self.system_fonts {
            state.db.load_system_fonts();
            log::info!("Found {} system font faces", state.db.len());
        }

        let dir = dir.map(Path::to_path_buf).unwrap_or_else(fonts_dir);
        state.load_dir(&dir);
        families::set_defaults(&mut state.db);
    }

    fn ensure_loaded(&self) {
        if !self.is_loaded() {
            self.load_fonts(None);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FontState> {
        self.ensure_loaded();
        self.state.read().unwrap()
    }

    /// Check whether a font family can be used
    ///
    /// Loads fonts (from the default directory) if not yet loaded. Checks
    /// custom fonts first, then all families known to the database.
    pub fn is_available(&self, name: &str) -> bool {
        let state = self.read();
        state.custom.contains(name) || state.has_family(name)
    }

    /// Names of custom (non-system) fonts registered so far
    pub fn available_fonts(&self) -> BTreeSet<String> {
        self.read().custom.clone()
    }

    /// Warnings recorded so far
    pub fn warnings(&self) -> Vec<FontWarning> {
        self.state.read().unwrap().warnings.clone()
    }

    /// Record a non-fatal warning
    pub fn warn(&self, warning: FontWarning) {
        self.state.write().unwrap().warn(warning);
    }

    /// Resolve `family` to itself or [`super::FALLBACK_FAMILY`]
    ///
    /// Records a [`FontWarning::FamilyUnavailable`] on fallback.
    pub fn resolve_family(&self, family: &str) -> String {
        if self.is_available(family) {
            return family.to_string();
        }
        self.warn(FontWarning::FamilyUnavailable {
            requested: family.to_string(),
            fallback: super::FALLBACK_FAMILY.to_string(),
        });
        super::FALLBACK_FAMILY.to_string()
    }

    /// Measure the advance width of `text` in points
    ///
    /// Uses the horizontal advances of the best face for `family` (falling
    /// back to the generic sans-serif face). If no face is available, a
    /// fixed average advance per character is assumed.
    pub fn measure_text(&self, family: &str, size: f64, text: &str) -> f64 {
        let state = self.read();
        let families = [Family::Name(family), Family::SansSerif];
        let query = Query {
            families: &families,
            ..Default::default()
        };
        let width = state.db.query(&query).and_then(|id| {
            state
                .db
                .with_face_data(id, |data, index| advance_width(data, index, size, text))
                .flatten()
        });
        width.unwrap_or_else(|| text.chars().count() as f64 * size * FALLBACK_ADVANCE)
    }

    /// Get the raw data of the face registered for `family`
    ///
    /// Only exact family matches are returned. Used for embedding fonts in
    /// documents.
    pub fn face_data(&self, family: &str) -> Option<Vec<u8>> {
        let state = self.read();
        let families = [Family::Name(family)];
        let query = Query {
            families: &families,
            ..Default::default()
        };
        let id = state.db.query(&query)?;
        state.db.with_face_data(id, |data, _| data.to_vec())
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FontState {
    // Each distinct warning is logged and kept once
    fn warn(&mut self, warning: FontWarning) {
        if self.warnings.contains(&warning) {
            return;
        }
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    fn has_family(&self, name: &str) -> bool {
        self.db
            .faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    }

    fn load_dir(&mut self, dir: &Path) {
        if !dir.is_dir() {
            self.warn(FontWarning::DirectoryMissing(dir.to_path_buf()));
            return;
        }

        let files: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| is_font_file(path))
                .collect(),
            Err(err) => {
                self.warn(FontWarning::DirectoryUnreadable {
                    path: dir.to_path_buf(),
                    message: err.to_string(),
                });
                return;
            }
        };

        if files.is_empty() {
            self.warn(FontWarning::NoFontFiles(dir.to_path_buf()));
            return;
        }

        for path in files {
            match self.register_file(&path) {
                Ok(families) => {
                    if let Some(stem) = path.file_stem() {
                        let stem = stem.to_string_lossy().into_owned();
                        log::info!("Loaded font: {stem}");
                        self.custom.insert(stem);
                    }
                    self.custom.extend(families);
                }
                Err(message) => self.warn(FontWarning::LoadFailed { path, message }),
            }
        }
    }

    fn register_file(&mut self, path: &Path) -> Result<Vec<String>, String> {
        let data = std::fs::read(path).map_err(|err| err.to_string())?;
        let count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
        let mut families = Vec::new();
        for index in 0..count {
            let face = Face::parse(&data, index).map_err(|err| err.to_string())?;
            families.extend(family_name(&face));
        }
        self.db.load_font_data(data);
        Ok(families)
    }
}

fn family_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == name_id::FAMILY)
        .find_map(|name| name.to_string())
}

fn advance_width(data: &[u8], index: u32, size: f64, text: &str) -> Option<f64> {
    let face = Face::parse(data, index).ok()?;
    let units_per_em = f64::from(face.units_per_em());
    let fallback = units_per_em * FALLBACK_ADVANCE;
    let units: f64 = text
        .chars()
        .map(|c| {
            face.glyph_index(c)
                .and_then(|id| face.glyph_hor_advance(id))
                .map(f64::from)
                .unwrap_or(fallback)
        })
        .sum();
    Some(units / units_per_em * size)
}

static MANAGER: LazyLock<FontManager> = LazyLock::new(FontManager::new);

/// Access the [`FontManager`] singleton
pub fn manager() -> &'static FontManager {
    &MANAGER
}

#[cfg(test)]
mod test {
    use super::*;

    fn empty() -> FontManager {
        FontManager::with_system_fonts(false)
    }

    #[test]
    fn missing_dir_warns() {
        let fonts = empty();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        fonts.load_fonts(Some(&missing));
        assert!(fonts.is_loaded());
        assert_eq!(fonts.warnings(), [FontWarning::DirectoryMissing(missing)]);
        assert!(fonts.available_fonts().is_empty());
    }

    #[test]
    fn empty_dir_warns() {
        let fonts = empty();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), "not a font").unwrap();
        fonts.load_fonts(Some(dir.path()));
        assert_eq!(
            fonts.warnings(),
            [FontWarning::NoFontFiles(dir.path().to_path_buf())]
        );
    }

    #[test]
    fn bad_font_is_not_fatal() {
        let fonts = empty();
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("Broken.ttf");
        std::fs::write(&bad, b"definitely not a font").unwrap();
        fonts.load_fonts(Some(dir.path()));

        let warnings = fonts.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(&warnings[0], FontWarning::LoadFailed { path, .. } if *path == bad));
        assert!(!fonts.is_available("Broken"));
    }

    #[test]
    fn load_is_idempotent() {
        let fonts = empty();
        let dir = tempfile::tempdir().unwrap();
        fonts.load_fonts(Some(&dir.path().join("first")));
        fonts.load_fonts(Some(&dir.path().join("second")));
        fonts.load_fonts(None);
        assert_eq!(fonts.warnings().len(), 1);
    }

    #[test]
    fn unknown_family() {
        let fonts = empty();
        assert!(!fonts.is_available("NonexistentFontXYZ"));
        // querying loads with defaults
        assert!(fonts.is_loaded());
        assert_eq!(fonts.resolve_family("NonexistentFontXYZ"), "DejaVu Sans");
        assert!(fonts
            .warnings()
            .iter()
            .any(|w| matches!(w, FontWarning::FamilyUnavailable { requested, .. } if requested == "NonexistentFontXYZ")));
    }

    #[test]
    fn repeated_fallback_warns_once() {
        let fonts = empty();
        for _ in 0..100 {
            assert_eq!(fonts.resolve_family("NonexistentFontXYZ"), "DejaVu Sans");
        }
        fonts.resolve_family("OtherMissingFont");
        let unavailable = fonts
            .warnings()
            .into_iter()
            .filter(|w| matches!(w, FontWarning::FamilyUnavailable { .. }))
            .count();
        assert_eq!(unavailable, 2);
    }

    #[test]
    fn registers_font_file() {
        let mut system = Database::new();
        system.load_system_fonts();
        let single_face = |path: &Path| {
            path.extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
        };
        let Some((source, family)) = system.faces().find_map(|face| match &face.source {
            fontdb::Source::File(path) if face.index == 0 && single_face(path) => {
                Some((path.clone(), face.families.first()?.0.clone()))
            }
            _ => None,
        }) else {
            // no system font files to copy
            return;
        };

        let dir = tempfile::tempdir().unwrap();
        let file_name = source.file_name().unwrap();
        std::fs::copy(&source, dir.path().join(file_name)).unwrap();
        let stem = Path::new(file_name).file_stem().unwrap().to_string_lossy().into_owned();

        let fonts = empty();
        fonts.load_fonts(Some(dir.path()));
        assert!(fonts.warnings().is_empty(), "{:?}", fonts.warnings());
        let custom = fonts.available_fonts();
        assert!(custom.contains(&stem));
        assert!(fonts.is_available(&stem));
        assert!(fonts.is_available(&family));
        assert!(fonts.face_data(&family).is_some_and(|data| !data.is_empty()));
        assert!(fonts.measure_text(&family, 10.0, "abc") > 0.0);
    }

    #[test]
    fn measure_without_faces() {
        let fonts = empty();
        let w = fonts.measure_text("NonexistentFontXYZ", 10.0, "abcd");
        assert!((w - 4.0 * 10.0 * FALLBACK_ADVANCE).abs() < 1e-9);
        assert_eq!(fonts.measure_text("x", 10.0, ""), 0.0);
        assert!(fonts.face_data("NonexistentFontXYZ").is_none());
    }
}
