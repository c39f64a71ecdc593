//! Integration tests for the icommands-ci command line
//!
//! These run the built binary against os-release fixtures; none of them
//! reach a real package manager.

mod common;

use common::{run_cli, TestWorkspace, ARCH_OS_RELEASE};
use regex::Regex;

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_lists_ci_flags() {
    let workspace = TestWorkspace::new();
    let output = run_cli(&workspace, &["--help"], &[]);

    assert!(output.status.success());
    let help = stdout(&output);
    for flag in [
        "--debug_build",
        "--irods_packages_root_directory",
        "--externals_packages_directory",
        "--output_root_directory",
        "--verbose",
    ] {
        assert!(help.contains(flag), "help is missing {flag}:\n{help}");
    }
}

#[test]
fn test_missing_packages_root_is_usage_error() {
    let workspace = TestWorkspace::new();
    let output = run_cli(&workspace, &["--verbose"], &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--irods_packages_root_directory"));
}

#[test]
fn test_unsupported_distribution_fails() {
    let workspace = TestWorkspace::new();
    workspace.create_file("os-release", ARCH_OS_RELEASE);
    workspace.create_dir("packages");
    let os_release = workspace.join("os-release");
    let packages = workspace.join("packages");

    let output = run_cli(
        &workspace,
        &[
            "--irods_packages_root_directory",
            packages.to_str().unwrap(),
            "--os_release_file",
            os_release.to_str().unwrap(),
            "--no_sudo",
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("not implemented"), "stderr: {err}");
    assert!(err.contains("Arch linux"), "stderr: {err}");
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_verbose_lines_use_ci_format() {
    let workspace = TestWorkspace::new();
    workspace.create_file("os-release", ARCH_OS_RELEASE);
    workspace.create_dir("packages");
    let os_release = workspace.join("os-release");
    let packages = workspace.join("packages");

    let output = run_cli(
        &workspace,
        &[
            "--verbose",
            "--irods_packages_root_directory",
            packages.to_str().unwrap(),
            "--os_release_file",
            os_release.to_str().unwrap(),
        ],
        &[],
    );

    assert!(!output.status.success());
    let line_format =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z - +(INFO|WARNING|ERROR) - +\S+\.rs: *\d+ - ")
            .unwrap();
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert!(!lines.is_empty(), "verbose run logged nothing");
    for line in lines {
        assert!(line_format.is_match(line), "unexpected log line: {line}");
    }
}

#[test]
fn test_unreadable_os_release_fails() {
    let workspace = TestWorkspace::new();
    workspace.create_dir("packages");
    let packages = workspace.join("packages");
    let os_release = workspace.join("missing-os-release");

    let output = run_cli(
        &workspace,
        &[
            "--irods_packages_root_directory",
            packages.to_str().unwrap(),
            "--os_release_file",
            os_release.to_str().unwrap(),
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("✗ Error: icommands CI build failed"), "stderr: {err}");
    assert!(err.contains("  Caused by: "), "stderr: {err}");
    assert!(err.contains("Failed to read distribution information"));
}

#[test]
fn test_flags_accepted_from_environment() {
    let workspace = TestWorkspace::new();
    workspace.create_file("os-release", ARCH_OS_RELEASE);
    workspace.create_dir("packages");

    let output = run_cli(
        &workspace,
        &[],
        &[
            (
                "ICOMMANDS_CI_IRODS_PACKAGES_ROOT_DIRECTORY",
                workspace.join("packages").display().to_string(),
            ),
            (
                "ICOMMANDS_CI_OS_RELEASE_FILE",
                workspace.join("os-release").display().to_string(),
            ),
        ],
    );

    // Gets past argument parsing and stops at the unsupported distribution
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not implemented"));
}

#[test]
fn test_verbose_from_environment_logs_to_stdout() {
    let workspace = TestWorkspace::new();
    workspace.create_file("os-release", ARCH_OS_RELEASE);
    workspace.create_dir("packages");
    let os_release = workspace.join("os-release");
    let packages = workspace.join("packages");

    let output = run_cli(
        &workspace,
        &[
            "--irods_packages_root_directory",
            packages.to_str().unwrap(),
            "--os_release_file",
            os_release.to_str().unwrap(),
        ],
        &[("ICOMMANDS_CI_VERBOSE", "true".to_string())],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains(" - Detected distribution: Arch linux"));
}
