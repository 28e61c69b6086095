use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ImportSettings;

fn has_audio_extension(path: &Path, settings: &ImportSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Turn a batch of user-supplied paths into the list of files to import.
///
/// Files are kept as given, whatever their extension. Directories are walked
/// and contribute the audio files they contain, in file-name order.
pub fn expand_paths(paths: &[PathBuf], settings: &ImportSettings) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut walker = WalkDir::new(path)
            .follow_links(settings.follow_links)
            .sort_by_file_name();
        // Non-recursive = only the directory itself.
        if !settings.recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let p = entry.path();
            if p.is_file() && has_audio_extension(p, settings) {
                files.push(p.to_path_buf());
            }
        }
    }

    files
}
