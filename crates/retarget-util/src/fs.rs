use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    find_ancestor_matching(start, filename, |_| true)
}

/// Like [`find_ancestor_with`], but only accepts a candidate file when
/// `accept` returns `true` for its path.
pub fn find_ancestor_matching(
    start: &Path,
    filename: &str,
    accept: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() && accept(&candidate) {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Read a file to a string, mapping failures to a manifest error that names the path.
pub fn read_manifest(path: &Path) -> miette::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        crate::errors::RetargetError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        }
        .into()
    })
}
