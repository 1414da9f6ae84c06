//! Sound directory scanning

use crate::error::{DesktopError, Result};
use lull_core::SoundDefinition;
use std::collections::HashSet;
use std::path::Path;

/// File extensions the decoder is expected to handle
const SOUND_EXTENSIONS: &[&str] = &["ogg", "mp3", "flac", "wav", "m4a", "aac", "opus"];

/// List the sound files directly inside `dir`, sorted by file name
///
/// Subdirectories and files with other extensions are skipped. When two
/// files share a stem only the first by path is kept.
pub fn scan_sounds(dir: &Path) -> Result<Vec<SoundDefinition>> {
    let entries = std::fs::read_dir(dir).map_err(|source| DesktopError::SoundsDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_sound_file(path))
        .collect();
    paths.sort();

    // Ids come from the file stem, so rain.mp3 and rain.ogg collide
    let mut seen = HashSet::new();
    let mut definitions = Vec::with_capacity(paths.len());
    for path in paths {
        let title = title_from_path(&path);
        let definition = SoundDefinition::new(title, path);
        if !seen.insert(definition.id.clone()) {
            tracing::warn!(
                path = %definition.path.display(),
                sound = %definition.id,
                "Skipping sound with a duplicate name"
            );
            continue;
        }
        definitions.push(definition);
    }

    tracing::info!(dir = %dir.display(), count = definitions.len(), "Scanned sounds");
    Ok(definitions)
}

fn is_sound_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOUND_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// `light-rain_02.ogg` becomes `Light Rain 02`
fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
