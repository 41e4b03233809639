//! Discover icon sets on disk
//!
//! The layout is one directory per set, holding one `.svg` file per icon:
//! ```text
//! icons/
//!   default/
//!     arrow-right.svg
//!     close.svg
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{Icon, IconSet, prepare_svg_source};
use crate::css::sanitize::format_label;
use crate::error::{Error, Result};

/// List the entries of `dir` matching `keep`, sorted by path
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_owned(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dir.to_owned(),
            source,
        })?;
        let path = entry.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// The file stem as a string
fn stem(path: &Path) -> Option<String> {
    Some(path.file_stem()?.to_string_lossy().into_owned())
}

/// Load every icon set below `dir`.
///
/// Sets without any svg icons are skipped, as are files that do not contain svg markup.
pub fn load_icon_sets(dir: &Path) -> Result<Vec<IconSet>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_owned()));
    }

    let mut icon_sets = Vec::new();
    for set_dir in sorted_entries(dir, Path::is_dir)? {
        let Some(name) = set_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
        else {
            continue;
        };

        let icons = load_icons(&set_dir)?;
        if icons.is_empty() {
            log::debug!("Skipping icon set {name} without icons");
            continue;
        }

        log::trace!("Loaded {} icons for set {name}", icons.len());
        icon_sets.push(IconSet {
            label: format_label(&name),
            name,
            icons,
        });
    }

    Ok(icon_sets)
}

/// Load the svg icons in a single set directory
fn load_icons(dir: &Path) -> Result<Vec<Icon>> {
    let files = sorted_entries(dir, |path| {
        path.is_file() && path.extension().is_some_and(|ext| ext == "svg")
    })?;

    let mut icons = Vec::new();
    for file in files {
        let Some(name) = stem(&file) else {
            continue;
        };

        let content = fs::read_to_string(&file).map_err(|source| Error::Io {
            path: file.clone(),
            source,
        })?;
        let Some(source) = prepare_svg_source(&content) else {
            log::debug!("Skipping {} as it is not svg", file.display());
            continue;
        };

        icons.push(Icon {
            label: format_label(&name),
            name,
            source,
        });
    }
    Ok(icons)
}
