//! Driver pipeline
//!
//! install dependencies → build → collect packages, strictly in sequence.
//! The first failure ends the run; a new run starts over in a new build
//! directory.

use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::core::builder::BuildRunner;
use crate::core::collect::ArtifactCollector;
use crate::core::distribution::Platform;
use crate::core::installer::DependencyInstaller;
use crate::error::CiError;
use crate::infra::packages::PackageManager;
use crate::infra::process::CommandRunner;

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Build directory holding logs and packages
    pub build_dir: PathBuf,
    /// Collected package paths (`None` when no output root was given)
    pub collected: Option<Vec<PathBuf>>,
}

/// Run the whole pipeline for `config`
pub fn run(config: &BuildConfig, runner: &dyn CommandRunner) -> Result<PipelineReport, CiError> {
    let platform = Platform::detect(config.os_release_path())?;
    tracing::info!(
        "Platform {} uses {} packages (.{})",
        platform.platform_string(),
        platform.family(),
        platform.package_suffix()
    );

    let packages = PackageManager::new(&platform, runner).with_elevation(config.elevation());
    DependencyInstaller::new(&packages, config.toolchain_bin_dir())
        .install(config.packages_root(), config.externals_dir())?;

    let build_dir = BuildRunner::new(runner, config.source_dir())
        .with_toolchain(config.toolchain_bin_dir())
        .with_temp_root(config.build_temp_root())
        .build(config.build_type())?;

    let collected = match config.output_root() {
        Some(output_root) => Some(ArtifactCollector::new(&platform).collect(&build_dir, output_root)?),
        None => {
            tracing::info!("No output root directory given, skipping package collection");
            None
        }
    };

    Ok(PipelineReport {
        build_dir,
        collected,
    })
}
