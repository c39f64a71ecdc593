//! Built package collection
//!
//! Copies the native packages produced by a build into the per-platform
//! subdirectory of an output root.

use std::path::{Path, PathBuf};

use crate::core::distribution::Platform;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Copies built packages out of a build directory
pub struct ArtifactCollector<'a> {
    platform: &'a Platform,
}

impl<'a> ArtifactCollector<'a> {
    pub fn new(platform: &'a Platform) -> Self {
        Self { platform }
    }

    /// Destination directory for `output_root`
    pub fn destination(&self, output_root: &Path) -> PathBuf {
        self.platform.os_specific_directory(output_root)
    }

    /// Copy every `*.<suffix>` file under `build_dir` into
    /// `<output_root>/<platform>/`; returns the copied paths
    pub fn collect(
        &self,
        build_dir: &Path,
        output_root: &Path,
    ) -> Result<Vec<PathBuf>, FilesystemError> {
        let destination = self.destination(output_root);
        let extension = format!(".{}", self.platform.package_suffix());
        let copied = filesystem::gather_files_satisfying_predicate(
            build_dir,
            &destination,
            |name| name.ends_with(&extension),
        )?;
        tracing::info!(
            "Collected {} package(s) into {}",
            copied.len(),
            destination.display()
        );
        Ok(copied)
    }
}
