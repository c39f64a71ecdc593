//! Configuration and constants
//!
//! [`BuildConfig`] is assembled once from command-line flags and is
//! read-only afterwards. Fixed values live in [`defaults`] and [`urls`].

pub mod defaults;
pub mod urls;

use std::fmt;
use std::path::{Path, PathBuf};

use defaults::{CMAKE_EXTERNAL, ELEVATION_COMMAND, OS_RELEASE_PATH};

/// CMake build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildType {
    /// Optimized build
    #[default]
    Release,
    /// Debug symbols, no optimization
    Debug,
}

impl BuildType {
    /// Map the `--debug_build` flag to a build type
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            Self::Debug
        } else {
            Self::Release
        }
    }

    /// Value passed as `CMAKE_BUILD_TYPE`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Debug => "Debug",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for one driver run
#[derive(Debug, Clone)]
pub struct BuildConfig {
    packages_root: PathBuf,
    externals_dir: Option<PathBuf>,
    output_root: Option<PathBuf>,
    build_type: BuildType,
    verbose: bool,
    source_dir: PathBuf,
    toolchain_bin_dir: PathBuf,
    os_release_path: PathBuf,
    elevation: Option<String>,
    build_temp_root: Option<PathBuf>,
}

impl BuildConfig {
    /// Create a configuration with defaults for everything but the packages root
    pub fn new(packages_root: impl Into<PathBuf>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            packages_root: packages_root.into(),
            externals_dir: None,
            output_root: None,
            build_type: BuildType::default(),
            verbose: false,
            source_dir: source_dir.into(),
            toolchain_bin_dir: CMAKE_EXTERNAL.install_dir().join("bin"),
            os_release_path: PathBuf::from(OS_RELEASE_PATH),
            elevation: Some(ELEVATION_COMMAND.to_string()),
            build_temp_root: None,
        }
    }

    /// Install externals from local package files instead of the repository
    #[must_use]
    pub fn with_externals_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.externals_dir = Some(dir.into());
        self
    }

    /// Collect built packages under this directory
    #[must_use]
    pub fn with_output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_root = Some(dir.into());
        self
    }

    /// Set the build type
    #[must_use]
    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Set verbosity
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Override the toolchain directory put in front of the search path
    #[must_use]
    pub fn with_toolchain_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.toolchain_bin_dir = dir.into();
        self
    }

    /// Read distribution information from another os-release file
    #[must_use]
    pub fn with_os_release_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_release_path = path.into();
        self
    }

    /// Set the privilege escalation command (`None` runs package managers directly)
    #[must_use]
    pub fn with_elevation(mut self, elevation: Option<String>) -> Self {
        self.elevation = elevation;
        self
    }

    /// Create the build directory under this directory instead of the system temp dir
    #[must_use]
    pub fn with_build_temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_temp_root = Some(dir.into());
        self
    }

    pub fn packages_root(&self) -> &Path {
        &self.packages_root
    }

    pub fn externals_dir(&self) -> Option<&Path> {
        self.externals_dir.as_deref()
    }

    pub fn output_root(&self) -> Option<&Path> {
        self.output_root.as_deref()
    }

    pub fn build_type(&self) -> BuildType {
        self.build_type
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn toolchain_bin_dir(&self) -> &Path {
        &self.toolchain_bin_dir
    }

    pub fn os_release_path(&self) -> &Path {
        &self.os_release_path
    }

    pub fn elevation(&self) -> Option<&str> {
        self.elevation.as_deref()
    }

    pub fn build_temp_root(&self) -> Option<&Path> {
        self.build_temp_root.as_deref()
    }
}
