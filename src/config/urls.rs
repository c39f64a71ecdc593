//! iRODS core-dev package repository locations

/// Signing key for the core-dev repository
pub const CORE_DEV_SIGNING_KEY: &str = "https://core-dev.irods.org/irods-core-dev-signing-key.asc";

/// Apt repository base
pub const CORE_DEV_APT_REPOSITORY: &str = "https://core-dev.irods.org/apt/";

/// Apt sources list written for the core-dev repository
pub const CORE_DEV_APT_SOURCES_LIST: &str = "/etc/apt/sources.list.d/renci-irods-core-dev.list";

/// Yum repository definition
pub const CORE_DEV_YUM_REPO: &str = "https://core-dev.irods.org/renci-irods-core-dev.yum.repo";

/// Destination of the yum repository definition
pub const CORE_DEV_YUM_REPO_FILE: &str = "/etc/yum.repos.d/renci-irods-core-dev.yum.repo";

/// PPA providing a newer libstdc++ on Ubuntu 12
pub const UBUNTU_TOOLCHAIN_PPA: &str = "ppa:ubuntu-toolchain-r/test";
