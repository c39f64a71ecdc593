//! Error types for icommands-ci
//!
//! Domain-specific error types using thiserror. Every failure is fatal to the
//! pipeline; nothing here is recovered locally.

use std::path::PathBuf;
use thiserror::Error;

/// Host distribution detection errors
#[derive(Error, Debug)]
pub enum DistributionError {
    /// os-release file could not be read
    #[error("Failed to read distribution information from '{path}': {error}")]
    Unreadable { path: PathBuf, error: String },

    /// Required os-release field is absent
    #[error("Distribution information in '{path}' is missing field '{field}'")]
    MissingField { path: PathBuf, field: String },

    /// Distribution family has no package recipe
    #[error("Build is not implemented for distribution '{distribution}'")]
    NotImplemented { distribution: String },

    /// No release codename for a distribution whose repository needs one
    #[error("No release codename known for distribution '{distribution}'")]
    MissingCodename { distribution: String },
}

/// External command errors
#[derive(Error, Debug)]
pub enum CommandError {
    /// Program not found on the effective search path
    #[error("Program '{program}' not found in search path '{search_path}'")]
    ProgramNotFound {
        program: String,
        search_path: String,
    },

    /// Process could not be started
    #[error("Failed to start '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Output log file could not be opened
    #[error("Failed to open log file '{path}': {error}")]
    LogFile { path: PathBuf, error: String },

    /// Process exited unsuccessfully
    #[error("Command '{command}' failed with {status}{}", format_stderr(.stderr))]
    NonZeroExit {
        command: String,
        status: String,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to list a directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Failed while walking a directory tree
    #[error("Failed to walk '{path}': {error}")]
    Walk { path: PathBuf, error: String },

    /// Failed to copy a file
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

/// Dependency installation errors
#[derive(Error, Debug)]
pub enum InstallError {
    /// No local package file for an external
    #[error("Dependency '{dependency}' not found: no '{dependency}*.{suffix}' in '{directory}'")]
    DependencyNotFound {
        dependency: String,
        suffix: String,
        directory: PathBuf,
    },

    /// More than one local package file for an external
    #[error("Dependency '{dependency}' is ambiguous: {} candidates ({})", .candidates.len(), display_paths(.candidates))]
    AmbiguousDependency {
        dependency: String,
        candidates: Vec<PathBuf>,
    },

    /// Distribution lacks information an install step needs
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// Package manager invocation failed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Filesystem error while locating packages
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Temporary build directory could not be created
    #[error("Failed to create build directory: {error}")]
    BuildDirectory { error: String },

    /// A build step exited unsuccessfully
    #[error("Build step '{step}' failed")]
    StepFailed {
        step: &'static str,
        #[source]
        source: CommandError,
    },
}

/// Top-level pipeline error type
#[derive(Error, Debug)]
pub enum CiError {
    /// Distribution error
    #[error("Distribution error: {0}")]
    Distribution(#[from] DistributionError),

    /// Install error
    #[error("Install error: {0}")]
    Install(#[from] InstallError),

    /// Build error
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}
