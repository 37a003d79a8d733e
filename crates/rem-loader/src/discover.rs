use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LoaderError, LoaderResult};

/// Dataset name derived from a source path: the file name without its
/// extension.
pub fn dataset_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// List the `*.json` files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into.
pub fn discover_sources(dir: &Path) -> LoaderResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(LoaderError::NotADirectory(dir.to_path_buf()));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let is_json = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if entry.file_type().is_file() && is_json {
            sources.push(entry.into_path());
        }
    }
    tracing::debug!(dir = %dir.display(), count = sources.len(), "discovered dataset sources");
    Ok(sources)
}
