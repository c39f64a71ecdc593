//! Filesystem operations
//!
//! Handles directory creation, package file lookup and artifact copying.

use std::path::{Path, PathBuf};

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Files directly inside `dir` named `<prefix>*.<suffix>`, sorted by path
pub fn files_with_prefix_and_suffix(
    dir: &Path,
    prefix: &str,
    suffix: &str,
) -> Result<Vec<PathBuf>, FilesystemError> {
    let read_error = |e: std::io::Error| FilesystemError::ReadDir {
        path: dir.to_path_buf(),
        error: e.to_string(),
    };
    let extension = format!(".{suffix}");

    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        if !entry.file_type().map_err(read_error)?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(prefix) && name.ends_with(&extension) {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches)
}

/// Copy every regular file under `src_dir` whose file name satisfies
/// `predicate` into `dst_dir`, flattening the tree
///
/// `dst_dir` is created if absent. Same-named files overwrite each other in
/// walk order. Files already inside `dst_dir` are left alone.
///
/// Returns the destination paths written.
pub fn gather_files_satisfying_predicate<P>(
    src_dir: &Path,
    dst_dir: &Path,
    predicate: P,
) -> Result<Vec<PathBuf>, FilesystemError>
where
    P: Fn(&str) -> bool,
{
    create_dir_all(dst_dir)?;

    // Snapshot the source first so copies landing inside src_dir are not revisited
    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(src_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| FilesystemError::Walk {
            path: src_dir.to_path_buf(),
            error: e.to_string(),
        })?;
        if !entry.file_type().is_file() || entry.path().parent() == Some(dst_dir) {
            continue;
        }
        if entry.file_name().to_str().is_some_and(&predicate) {
            sources.push(entry.into_path());
        }
    }

    let mut copied = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let destination = dst_dir.join(name);
        tracing::debug!("Copying {} to {}", source.display(), destination.display());
        std::fs::copy(&source, &destination).map_err(|e| FilesystemError::CopyFile {
            from: source.clone(),
            to: destination.clone(),
            error: e.to_string(),
        })?;
        copied.push(destination);
    }
    Ok(copied)
}
