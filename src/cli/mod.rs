//! Command-line interface module
//!
//! This module handles argument parsing and log output.
//! It contains no build logic - that belongs in the [`crate::core`] module.
//!
//! Flag names keep the underscore spelling CI jobs already pass.

pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::defaults::EXTERNALS_DIRECTORY_NONE;
use crate::config::{BuildConfig, BuildType};
use crate::core::pipeline;
use crate::infra::process::SystemRunner;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (git ",
    env!("VERGEN_GIT_SHA"),
    ", ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    ")"
);

/// icommands-ci - iRODS icommands CI build driver
///
/// Installs build dependencies, builds the icommands packages and optionally
/// collects them into an output directory.
#[derive(Parser, Debug)]
#[command(name = "icommands-ci")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// Build with CMAKE_BUILD_TYPE=Debug instead of Release
    #[arg(long = "debug_build", env = "ICOMMANDS_CI_DEBUG_BUILD")]
    pub debug_build: bool,

    /// Directory holding the irods-dev and irods-runtime packages
    #[arg(
        long = "irods_packages_root_directory",
        value_name = "DIR",
        env = "ICOMMANDS_CI_IRODS_PACKAGES_ROOT_DIRECTORY"
    )]
    pub irods_packages_root_directory: PathBuf,

    /// Directory holding externals package files; omit (or pass "None") to
    /// install externals from the core-dev repository
    #[arg(
        long = "externals_packages_directory",
        value_name = "DIR",
        env = "ICOMMANDS_CI_EXTERNALS_PACKAGES_DIRECTORY"
    )]
    pub externals_packages_directory: Option<String>,

    /// Copy built packages into <DIR>/<platform>/
    #[arg(
        long = "output_root_directory",
        value_name = "DIR",
        env = "ICOMMANDS_CI_OUTPUT_ROOT_DIRECTORY"
    )]
    pub output_root_directory: Option<PathBuf>,

    /// Log progress to stdout
    #[arg(long, env = "ICOMMANDS_CI_VERBOSE")]
    pub verbose: bool,

    /// icommands source tree (defaults to the current directory)
    #[arg(long = "source_directory", value_name = "DIR", env = "ICOMMANDS_CI_SOURCE_DIRECTORY")]
    pub source_directory: Option<PathBuf>,

    /// Toolchain directory searched first by build commands
    #[arg(
        long = "toolchain_bin_directory",
        value_name = "DIR",
        env = "ICOMMANDS_CI_TOOLCHAIN_BIN_DIRECTORY"
    )]
    pub toolchain_bin_directory: Option<PathBuf>,

    /// os-release file describing the host distribution; `lsb-release` and
    /// `redhat-release` in the same directory fill in what it lacks
    #[arg(long = "os_release_file", value_name = "FILE", env = "ICOMMANDS_CI_OS_RELEASE_FILE")]
    pub os_release_file: Option<PathBuf>,

    /// Run package manager commands without sudo
    #[arg(long = "no_sudo", env = "ICOMMANDS_CI_NO_SUDO")]
    pub no_sudo: bool,
}

impl Cli {
    /// Turn parsed flags into the run configuration
    pub fn to_config(&self) -> Result<BuildConfig> {
        let source_dir = match &self.source_directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let mut config = BuildConfig::new(&self.irods_packages_root_directory, source_dir)
            .with_build_type(BuildType::from_debug_flag(self.debug_build))
            .with_verbose(self.verbose);

        if let Some(dir) = self
            .externals_packages_directory
            .as_deref()
            .filter(|dir| !dir.is_empty() && *dir != EXTERNALS_DIRECTORY_NONE)
        {
            config = config.with_externals_dir(dir);
        }
        if let Some(dir) = &self.output_root_directory {
            config = config.with_output_root(dir);
        }
        if let Some(dir) = &self.toolchain_bin_directory {
            config = config.with_toolchain_bin_dir(dir);
        }
        if let Some(path) = &self.os_release_file {
            config = config.with_os_release_path(path);
        }
        if self.no_sudo {
            config = config.with_elevation(None);
        }
        Ok(config)
    }
}

/// Execute the driver for a parsed configuration
pub fn run(config: &BuildConfig) -> Result<()> {
    tracing::info!(
        "Building icommands ({}) from {}",
        config.build_type(),
        config.source_dir().display()
    );

    let report =
        pipeline::run(config, &SystemRunner::new()).context("icommands CI build failed")?;

    match &report.collected {
        Some(collected) => tracing::info!(
            "Done: {} package(s) collected from {}",
            collected.len(),
            report.build_dir.display()
        ),
        None => tracing::info!("Done: packages left in {}", report.build_dir.display()),
    }
    Ok(())
}
