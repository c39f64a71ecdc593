//! Build dependency installation
//!
//! Installs the externals toolchain (from the core-dev repository or from
//! local package files), the family-specific development packages, and the
//! previously built iRODS dev and runtime packages.

use std::path::{Path, PathBuf};

use crate::config::defaults::{ExternalPackage, EXTERNALS, IRODS_PACKAGE_PREFIXES};
use crate::config::urls::UBUNTU_TOOLCHAIN_PPA;
use crate::core::distribution::{OsFamily, Platform};
use crate::error::InstallError;
use crate::infra::filesystem;
use crate::infra::packages::PackageManager;

const APT_DEV_PACKAGES: &[&str] = &[
    "fakeroot",
    "help2man",
    "libbz2-dev",
    "libcurl4-gnutls-dev",
    "libkrb5-dev",
    "libpam0g-dev",
    "libssl-dev",
    "make",
    "python-dev",
    "unixodbc",
    "unixodbc-dev",
    "zlib1g-dev",
];

const YUM_DEV_PACKAGES: &[&str] = &[
    "bzip2-devel",
    "curl-devel",
    "fakeroot",
    "help2man",
    "openssl-devel",
    "pam-devel",
    "python-devel",
    "unixODBC",
    "unixODBC-devel",
    "zlib-devel",
];

impl OsFamily {
    /// Development packages this family needs on the given platform
    pub fn dev_packages(&self, platform: &Platform) -> Vec<&'static str> {
        match self {
            Self::Apt => APT_DEV_PACKAGES.to_vec(),
            Self::Yum => {
                let mut packages = YUM_DEV_PACKAGES.to_vec();
                if platform.distribution().version_major() == "7" {
                    packages.push("mysql++-devel");
                }
                packages
            }
        }
    }

    /// Install this family's development packages
    pub fn install_dev_packages(&self, packages: &PackageManager<'_>) -> Result<(), InstallError> {
        let platform = packages.platform();
        if *self == Self::Apt && needs_toolchain_ppa(platform) {
            // cmake from externals needs a newer libstdc++ than Ubuntu 12 ships
            packages.install_packages(&["python-software-properties"])?;
            packages.run_elevated("add-apt-repository", &["-y", UBUNTU_TOOLCHAIN_PPA])?;
            packages.install_packages(&["libstdc++6"])?;
        }
        packages.install_packages(&self.dev_packages(platform))?;
        Ok(())
    }
}

fn needs_toolchain_ppa(platform: &Platform) -> bool {
    let distribution = platform.distribution();
    distribution.name() == "Ubuntu" && distribution.version_major() == "12"
}

/// Installs everything the icommands build needs
pub struct DependencyInstaller<'a> {
    packages: &'a PackageManager<'a>,
    toolchain_bin_dir: &'a Path,
}

impl<'a> DependencyInstaller<'a> {
    /// Create an installer; commands after the externals step search
    /// `toolchain_bin_dir` first
    pub fn new(packages: &'a PackageManager<'a>, toolchain_bin_dir: &'a Path) -> Self {
        Self {
            packages,
            toolchain_bin_dir,
        }
    }

    /// Install externals, development packages and iRODS dev/runtime packages
    ///
    /// With no `externals_dir` the externals come from the core-dev
    /// repository; otherwise every external must match exactly one package
    /// file in the platform subdirectory of `externals_dir`, and all are
    /// resolved before anything is installed.
    pub fn install(
        &self,
        packages_dir: &Path,
        externals_dir: Option<&Path>,
    ) -> Result<(), InstallError> {
        match externals_dir {
            None => {
                self.packages.install_core_dev_repository()?;
                let names: Vec<String> = EXTERNALS.iter().map(ExternalPackage::package_name).collect();
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                self.packages.install_packages(&names)?;
            }
            Some(dir) => {
                let files = self.resolve_external_files(dir)?;
                self.packages.install_package_files(&files)?;
            }
        }

        tracing::info!(
            "Using toolchain directory {} for subsequent commands",
            self.toolchain_bin_dir.display()
        );
        let toolchain_packages = self.packages.clone().with_path_prefix(self.toolchain_bin_dir);

        let platform = self.packages.platform();
        platform.family().install_dev_packages(&toolchain_packages)?;

        let irods_packages = self.find_irods_packages(packages_dir)?;
        if irods_packages.is_empty() {
            tracing::warn!(
                "No irods-dev or irods-runtime packages found in {}",
                packages_dir.display()
            );
        }
        toolchain_packages.install_package_files(&irods_packages)?;
        Ok(())
    }

    /// Locate one package file per external under `<externals_dir>/<platform>`
    pub fn resolve_external_files(&self, externals_dir: &Path) -> Result<Vec<PathBuf>, InstallError> {
        let platform = self.packages.platform();
        let directory = platform.os_specific_directory(externals_dir);
        let suffix = platform.package_suffix();

        let mut files = Vec::with_capacity(EXTERNALS.len());
        for external in EXTERNALS {
            let dependency = external.package_name();
            let mut candidates =
                filesystem::files_with_prefix_and_suffix(&directory, &dependency, suffix)?;
            match candidates.len() {
                0 => {
                    return Err(InstallError::DependencyNotFound {
                        dependency,
                        suffix: suffix.to_string(),
                        directory,
                    })
                }
                1 => files.append(&mut candidates),
                _ => {
                    return Err(InstallError::AmbiguousDependency {
                        dependency,
                        candidates,
                    })
                }
            }
        }
        Ok(files)
    }

    fn find_irods_packages(&self, packages_dir: &Path) -> Result<Vec<PathBuf>, InstallError> {
        let suffix = self.packages.platform().package_suffix();
        let mut files = Vec::new();
        for prefix in IRODS_PACKAGE_PREFIXES {
            files.extend(filesystem::files_with_prefix_and_suffix(
                packages_dir,
                prefix,
                suffix,
            )?);
        }
        Ok(files)
    }
}
