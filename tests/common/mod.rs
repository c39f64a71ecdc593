//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// os-release of a supported apt platform
pub const UBUNTU_16_OS_RELEASE: &str = r#"NAME="Ubuntu"
VERSION="16.04.6 LTS (Xenial Xerus)"
ID=ubuntu
ID_LIKE=debian
VERSION_ID="16.04"
VERSION_CODENAME=xenial
UBUNTU_CODENAME=xenial
"#;

/// os-release of a supported yum platform
pub const CENTOS_7_OS_RELEASE: &str = r#"NAME="CentOS Linux"
VERSION="7 (Core)"
ID="centos"
ID_LIKE="rhel fedora"
VERSION_ID="7"
"#;

/// os-release of a platform the driver does not build on
pub const ARCH_OS_RELEASE: &str = r#"NAME="Arch Linux"
ID=arch
VERSION_ID="20240101.0.204074"
"#;

/// Test workspace context
///
/// Creates a temporary directory holding package directories, os-release
/// fixtures and fake build tools.
pub struct TestWorkspace {
    /// Temporary directory for the test workspace
    pub dir: TempDir,
}

impl TestWorkspace {
    /// Create a new test workspace in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Absolute path of `name` inside the workspace
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create a file in the test workspace
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test workspace
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test workspace
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Write an executable shell script named `program` into `bin/`
    #[cfg(unix)]
    pub fn fake_program(&self, program: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let name = format!("bin/{program}");
        self.create_file(&name, &format!("#!/bin/sh\n{body}\n"));
        let path = self.join(&name);
        let mut perms = std::fs::metadata(&path)
            .expect("Failed to stat script")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).expect("Failed to make script executable");
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the icommands-ci binary inside `workspace`
pub fn run_cli(workspace: &TestWorkspace, args: &[&str], envs: &[(&str, String)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_icommands-ci"));
    cmd.current_dir(workspace.path());
    cmd.args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute icommands-ci")
}
