//! Default configuration values

use std::path::PathBuf;

/// Prebuilt third-party toolchain package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalPackage {
    /// Component name (e.g. "cmake")
    pub name: &'static str,
    /// Component version including package revision (e.g. "3.11.4-0")
    pub version: &'static str,
}

impl ExternalPackage {
    /// Package identifier as published, e.g. `irods-externals-cmake3.11.4-0`
    pub fn package_name(&self) -> String {
        format!("{EXTERNALS_PACKAGE_PREFIX}{}{}", self.name, self.version)
    }

    /// Directory the package installs into
    pub fn install_dir(&self) -> PathBuf {
        PathBuf::from(EXTERNALS_INSTALL_ROOT).join(format!("{}{}", self.name, self.version))
    }
}

/// Prefix shared by every externals package name
pub const EXTERNALS_PACKAGE_PREFIX: &str = "irods-externals-";

/// Root directory externals packages install under
pub const EXTERNALS_INSTALL_ROOT: &str = "/opt/irods-externals";

/// CMake from externals; its `bin/` leads the search path for every build step
pub const CMAKE_EXTERNAL: ExternalPackage = ExternalPackage {
    name: "cmake",
    version: "3.11.4-0",
};

/// Externals required to build the icommands, in install order
pub const EXTERNALS: &[ExternalPackage] = &[
    CMAKE_EXTERNAL,
    ExternalPackage { name: "avro", version: "1.9.0-0" },
    ExternalPackage { name: "boost", version: "1.67.0-0" },
    ExternalPackage { name: "catch2", version: "2.3.0-0" },
    ExternalPackage { name: "clang-runtime", version: "6.0-0" },
    ExternalPackage { name: "clang", version: "6.0-0" },
    ExternalPackage { name: "cppzmq", version: "4.2.3-0" },
    ExternalPackage { name: "fmt", version: "6.1.2-1" },
    ExternalPackage { name: "json", version: "3.7.3-0" },
    ExternalPackage { name: "libarchive", version: "3.3.2-1" },
    ExternalPackage { name: "nanodbc", version: "2.13.0-0" },
    ExternalPackage { name: "spdlog", version: "0.17.0-0" },
    ExternalPackage { name: "zeromq4-1", version: "4.1.6-0" },
];

/// File name prefixes of previously built iRODS packages installed before the build
pub const IRODS_PACKAGE_PREFIXES: &[&str] = &["irods-dev", "irods-runtime"];

/// Prefix of the temporary build directory
pub const BUILD_DIR_PREFIX: &str = "icommands_build_dir";

/// Log capturing the configure step
pub const CMAKE_LOG: &str = "cmake.output";

/// Log capturing the compile and packaging steps
pub const MAKE_LOG: &str = "make.output";

/// Default os-release location
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Release files read from the os-release file's directory when it lacks
/// information (older Ubuntu has no codename, CentOS 6 has no os-release)
pub const LSB_RELEASE_FILE: &str = "lsb-release";
pub const REDHAT_RELEASE_FILE: &str = "redhat-release";

/// Default privilege escalation command for package manager calls
pub const ELEVATION_COMMAND: &str = "sudo";

/// Value CI jobs pass when no externals directory is available
pub const EXTERNALS_DIRECTORY_NONE: &str = "None";
