//! icommands-ci - Continuous-integration build driver for the iRODS icommands
//!
//! Installs the build dependencies for the host distribution, builds the
//! icommands packages with CMake, and collects the resulting native packages.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line parsing and log output
//! - [`core`] - Pipeline sequencing: install, build, collect
//! - [`infra`] - Processes, filesystem and package managers
//! - [`config`] - Run configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
