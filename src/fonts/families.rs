// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Preferred generic families
//!
//! `fontdb` does not pick a face for each generic family, so after loading we
//! choose the first installed name from each list. Ordering indicates
//! preference: metric-compatible replacements for the common journal fonts
//! come first.

const SANS_SERIF: [&str; 10] = [
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "Arimo",
    "DejaVu Sans",
    "Noto Sans",
    "Open Sans",
    "Roboto",
    "Verdana",
    "Tahoma",
];

const SERIF: [&str; 7] = [
    "Times New Roman",
    "Times",
    "Liberation Serif",
    "Tinos",
    "DejaVu Serif",
    "Noto Serif",
    "Georgia",
];

const MONOSPACE: [&str; 6] = [
    "Courier New",
    "Liberation Mono",
    "Cousine",
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "Menlo",
];

fn first_installed(db: &fontdb::Database, names: &[&'static str]) -> Option<&'static str> {
    names.iter().copied().find(|name| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    })
}

/// Set generic family names on `db` from what is installed
pub(crate) fn set_defaults(db: &mut fontdb::Database) {
    if let Some(name) = first_installed(db, &SANS_SERIF) {
        log::debug!("default sans-serif font: {name}");
        db.set_sans_serif_family(name);
    }
    if let Some(name) = first_installed(db, &SERIF) {
        log::debug!("default serif font: {name}");
        db.set_serif_family(name);
    }
    if let Some(name) = first_installed(db, &MONOSPACE) {
        log::debug!("default monospace font: {name}");
        db.set_monospace_family(name);
    }
}
