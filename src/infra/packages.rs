//! OS package manager interface
//!
//! Wraps apt and yum behind one API. Every call goes through a
//! [`CommandRunner`] and is prefixed with the configured privilege escalation
//! command.

use std::path::{Path, PathBuf};

use crate::config::urls;
use crate::core::distribution::{OsFamily, Platform};
use crate::error::{CommandError, DistributionError, InstallError};
use crate::infra::process::{CommandRunner, Invocation};

/// Package operations for one host platform
#[derive(Clone)]
pub struct PackageManager<'a> {
    platform: &'a Platform,
    runner: &'a dyn CommandRunner,
    elevation: Option<String>,
    path_prefix: Option<PathBuf>,
}

impl<'a> PackageManager<'a> {
    /// Create a package manager for `platform`
    pub fn new(platform: &'a Platform, runner: &'a dyn CommandRunner) -> Self {
        Self {
            platform,
            runner,
            elevation: None,
            path_prefix: None,
        }
    }

    /// Run privileged commands through `command` (e.g. `sudo`)
    #[must_use]
    pub fn with_elevation(mut self, command: Option<&str>) -> Self {
        self.elevation = command.map(String::from);
        self
    }

    /// Search `dir` first for every command issued from now on
    #[must_use]
    pub fn with_path_prefix(mut self, dir: &Path) -> Self {
        self.path_prefix = Some(dir.to_path_buf());
        self
    }

    pub fn platform(&self) -> &Platform {
        self.platform
    }

    /// Build a privileged invocation of `program`
    pub fn elevated(&self, program: &str) -> Invocation {
        let invocation = match &self.elevation {
            Some(elevation) => Invocation::new(elevation.as_str()).arg(program),
            None => Invocation::new(program),
        };
        match &self.path_prefix {
            Some(prefix) => invocation.path_prefix(prefix),
            None => invocation,
        }
    }

    /// Run a privileged command, failing on non-zero exit
    pub fn run_elevated(&self, program: &str, args: &[&str]) -> Result<(), CommandError> {
        self.runner
            .run(&self.elevated(program).args(args.iter().copied()))?;
        Ok(())
    }

    /// Install packages by name from configured repositories
    pub fn install_packages(&self, names: &[&str]) -> Result<(), CommandError> {
        if names.is_empty() {
            return Ok(());
        }
        tracing::info!("Installing packages: {}", names.join(" "));
        match self.platform.family() {
            OsFamily::Apt => {
                self.run_elevated("apt-get", &["update"])?;
                self.runner.run(
                    &self
                        .elevated("apt-get")
                        .args(["install", "-y"])
                        .args(names.iter().copied()),
                )?;
            }
            OsFamily::Yum => {
                self.runner.run(
                    &self
                        .elevated("yum")
                        .args(["install", "-y"])
                        .args(names.iter().copied()),
                )?;
            }
        }
        Ok(())
    }

    /// Install local package files as one batch
    pub fn install_package_files(&self, files: &[PathBuf]) -> Result<(), CommandError> {
        if files.is_empty() {
            return Ok(());
        }
        let paths: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
        tracing::info!("Installing package files: {}", paths.join(" "));
        match self.platform.family() {
            OsFamily::Apt => {
                // dpkg leaves unmet dependencies behind; apt-get -f resolves them
                self.runner.run(
                    &self
                        .elevated("dpkg")
                        .arg("-i")
                        .args(paths)
                        .unchecked(),
                )?;
                self.run_elevated("apt-get", &["update"])?;
                self.run_elevated("apt-get", &["install", "-fy"])?;
            }
            OsFamily::Yum => {
                self.runner.run(
                    &self
                        .elevated("yum")
                        .args(["localinstall", "-y", "--nogpgcheck"])
                        .args(paths),
                )?;
            }
        }
        Ok(())
    }

    /// Register the iRODS core-dev package repository
    ///
    /// The apt repository is selected by release codename; a platform
    /// without one fails before any command runs.
    pub fn install_core_dev_repository(&self) -> Result<(), InstallError> {
        tracing::info!("Registering iRODS core-dev repository");
        match self.platform.family() {
            OsFamily::Apt => {
                let distribution = self.platform.distribution();
                let codename = distribution.codename().ok_or_else(|| {
                    DistributionError::MissingCodename {
                        distribution: distribution.to_string(),
                    }
                })?;
                self.run_elevated(
                    "apt-key",
                    &["adv", "--fetch-keys", urls::CORE_DEV_SIGNING_KEY],
                )?;
                let source = format!(
                    "deb [arch=amd64] {} {codename} main\n",
                    urls::CORE_DEV_APT_REPOSITORY
                );
                self.runner.run(
                    &self
                        .elevated("tee")
                        .arg(urls::CORE_DEV_APT_SOURCES_LIST)
                        .stdin(source),
                )?;
                self.run_elevated("apt-get", &["update"])?;
            }
            OsFamily::Yum => {
                self.run_elevated("rpm", &["--import", urls::CORE_DEV_SIGNING_KEY])?;
                self.run_elevated(
                    "wget",
                    &["-qO", urls::CORE_DEV_YUM_REPO_FILE, urls::CORE_DEV_YUM_REPO],
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distribution::Distribution;
    use crate::test_utils::RecordingRunner;

    fn ubuntu() -> Platform {
        Platform::resolve(Distribution::new("Ubuntu", "18", Some("bionic"))).unwrap()
    }

    fn centos() -> Platform {
        Platform::resolve(Distribution::new("CentOS Linux", "7", None)).unwrap()
    }

    #[test]
    fn test_apt_install_updates_first() {
        let platform = ubuntu();
        let runner = RecordingRunner::new();
        PackageManager::new(&platform, &runner)
            .with_elevation(Some("sudo"))
            .install_packages(&["make", "fakeroot"])
            .unwrap();
        assert_eq!(
            runner.command_lines(),
            vec![
                "sudo apt-get update",
                "sudo apt-get install -y make fakeroot"
            ]
        );
    }

    #[test]
    fn test_yum_install_without_elevation() {
        let platform = centos();
        let runner = RecordingRunner::new();
        PackageManager::new(&platform, &runner)
            .install_packages(&["zlib-devel"])
            .unwrap();
        assert_eq!(runner.command_lines(), vec!["yum install -y zlib-devel"]);
    }

    #[test]
    fn test_empty_batch_runs_nothing() {
        let platform = ubuntu();
        let runner = RecordingRunner::new();
        let packages = PackageManager::new(&platform, &runner);
        packages.install_packages(&[]).unwrap();
        packages.install_package_files(&[]).unwrap();
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn test_apt_file_install_tolerates_dpkg_failure() {
        let platform = ubuntu();
        let runner = RecordingRunner::new().fail_on("dpkg", 1);
        PackageManager::new(&platform, &runner)
            .install_package_files(&[PathBuf::from("/pkgs/irods-dev.deb")])
            .unwrap();
        assert_eq!(
            runner.command_lines(),
            vec![
                "dpkg -i /pkgs/irods-dev.deb",
                "apt-get update",
                "apt-get install -fy"
            ]
        );
    }

    #[test]
    fn test_yum_file_install_is_one_batch() {
        let platform = centos();
        let runner = RecordingRunner::new();
        PackageManager::new(&platform, &runner)
            .with_elevation(Some("sudo"))
            .install_package_files(&[PathBuf::from("/a.rpm"), PathBuf::from("/b.rpm")])
            .unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["sudo yum localinstall -y --nogpgcheck /a.rpm /b.rpm"]
        );
    }

    #[test]
    fn test_apt_core_dev_repository_uses_codename() {
        let platform = ubuntu();
        let runner = RecordingRunner::new();
        PackageManager::new(&platform, &runner)
            .install_core_dev_repository()
            .unwrap();
        let tee = runner
            .invocations()
            .into_iter()
            .find(|i| i.program() == "tee")
            .unwrap();
        assert_eq!(
            tee.stdin_input(),
            Some("deb [arch=amd64] https://core-dev.irods.org/apt/ bionic main\n")
        );
        assert!(runner.ran("apt-key adv --fetch-keys"));
    }

    #[test]
    fn test_apt_core_dev_repository_requires_codename() {
        let content = "NAME=\"Ubuntu\"\nVERSION=\"14.04.6 LTS, Trusty Tahr\"\nVERSION_ID=\"14.04\"\n";
        let distribution =
            Distribution::parse_os_release(content, Path::new("/etc/os-release")).unwrap();
        let platform = Platform::resolve(distribution).unwrap();
        let runner = RecordingRunner::new();

        let err = PackageManager::new(&platform, &runner)
            .install_core_dev_repository()
            .unwrap_err();

        assert!(matches!(
            err,
            InstallError::Distribution(DistributionError::MissingCodename { .. })
        ));
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn test_apt_core_dev_repository_trusty() {
        let platform =
            Platform::resolve(Distribution::new("Ubuntu", "14", Some("trusty"))).unwrap();
        let runner = RecordingRunner::new();
        PackageManager::new(&platform, &runner)
            .install_core_dev_repository()
            .unwrap();
        let tee = runner
            .invocations()
            .into_iter()
            .find(|i| i.program() == "tee")
            .unwrap();
        assert_eq!(
            tee.stdin_input(),
            Some("deb [arch=amd64] https://core-dev.irods.org/apt/ trusty main\n")
        );
    }

    #[test]
    fn test_yum_core_dev_repository() {
        let platform = centos();
        let runner = RecordingRunner::new();
        PackageManager::new(&platform, &runner)
            .install_core_dev_repository()
            .unwrap();
        assert!(runner.ran("rpm --import"));
        assert!(runner.ran("wget -qO /etc/yum.repos.d/renci-irods-core-dev.yum.repo"));
    }

    #[test]
    fn test_path_prefix_is_threaded() {
        let platform = centos();
        let runner = RecordingRunner::new();
        PackageManager::new(&platform, &runner)
            .with_path_prefix(Path::new("/opt/irods-externals/cmake3.11.4-0/bin"))
            .install_packages(&["help2man"])
            .unwrap();
        assert_eq!(
            runner.invocations()[0].search_path_prefix(),
            Some(Path::new("/opt/irods-externals/cmake3.11.4-0/bin"))
        );
    }

    #[test]
    fn test_failure_propagates() {
        let platform = centos();
        let runner = RecordingRunner::new().fail_on("yum", 1);
        let err = PackageManager::new(&platform, &runner)
            .install_packages(&["help2man"])
            .unwrap_err();
        assert!(matches!(err, CommandError::NonZeroExit { .. }));
    }
}
