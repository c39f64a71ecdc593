//! Host distribution detection
//!
//! Reads the os-release file once per run and resolves it into a
//! [`Platform`]: the distribution identity plus the closed [`OsFamily`]
//! that decides package format and package manager.

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::defaults::{LSB_RELEASE_FILE, REDHAT_RELEASE_FILE};
use crate::error::DistributionError;

/// Host distribution identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    name: String,
    version_major: String,
    codename: Option<String>,
}

impl Distribution {
    /// Create a distribution identity
    ///
    /// `name` is normalized the way the CI infrastructure names platforms:
    /// first character upper-cased, the rest lower-cased.
    pub fn new(name: &str, version_major: &str, codename: Option<&str>) -> Self {
        Self {
            name: capitalize(name),
            version_major: version_major.to_string(),
            codename: codename.map(String::from),
        }
    }

    /// Detect the host distribution from `os_release` and the release
    /// files next to it
    ///
    /// When the os-release file does not exist, `redhat-release` is parsed
    /// instead. A missing codename is taken from `DISTRIB_CODENAME` in
    /// `lsb-release` when that file is present.
    pub fn detect(os_release: &Path) -> Result<Self, DistributionError> {
        let unreadable = |e: std::io::Error| DistributionError::Unreadable {
            path: os_release.to_path_buf(),
            error: e.to_string(),
        };
        let distribution = match std::fs::read_to_string(os_release) {
            Ok(content) => Self::parse_os_release(&content, os_release)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let redhat_release = os_release.with_file_name(REDHAT_RELEASE_FILE);
                let Ok(content) = std::fs::read_to_string(&redhat_release) else {
                    return Err(unreadable(e));
                };
                tracing::info!("Reading distribution from {}", redhat_release.display());
                Self::parse_redhat_release(&content, &redhat_release)?
            }
            Err(e) => return Err(unreadable(e)),
        };

        if distribution.codename.is_some() {
            return Ok(distribution);
        }
        let lsb_release = os_release.with_file_name(LSB_RELEASE_FILE);
        let codename = std::fs::read_to_string(lsb_release)
            .ok()
            .and_then(|content| parse_fields(&content).remove("DISTRIB_CODENAME"))
            .filter(|codename| !codename.is_empty());
        Ok(Self {
            codename,
            ..distribution
        })
    }

    /// Parse os-release content; `origin` is only used in error messages
    pub fn parse_os_release(content: &str, origin: &Path) -> Result<Self, DistributionError> {
        let fields = parse_fields(content);
        let missing = |field: &str| DistributionError::MissingField {
            path: origin.to_path_buf(),
            field: field.to_string(),
        };

        let name = fields.get("NAME").ok_or_else(|| missing("NAME"))?;
        let version_id = fields.get("VERSION_ID").ok_or_else(|| missing("VERSION_ID"))?;
        let version_major = version_id.split('.').next().unwrap_or_default();
        if version_major.is_empty() {
            return Err(missing("VERSION_ID"));
        }
        let codename = fields
            .get("VERSION_CODENAME")
            .or_else(|| fields.get("UBUNTU_CODENAME"))
            .map(String::as_str)
            .filter(|c| !c.is_empty());

        Ok(Self::new(name, version_major, codename))
    }

    /// Parse a `redhat-release` line such as `CentOS release 6.10 (Final)`
    pub fn parse_redhat_release(content: &str, origin: &Path) -> Result<Self, DistributionError> {
        let missing = || DistributionError::MissingField {
            path: origin.to_path_buf(),
            field: "release".to_string(),
        };
        let line = content.lines().next().unwrap_or_default().trim();
        let (name, rest) = line.split_once(" release ").ok_or_else(missing)?;
        let version_major = rest
            .split_whitespace()
            .next()
            .and_then(|version| version.split('.').next())
            .unwrap_or_default();
        if name.trim().is_empty() || version_major.is_empty() {
            return Err(missing());
        }
        Ok(Self::new(name, version_major, None))
    }

    /// Normalized distribution name, e.g. `Ubuntu` or `Centos linux`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Major version, e.g. `16`
    pub fn version_major(&self) -> &str {
        &self.version_major
    }

    /// Release codename, e.g. `xenial`
    pub fn codename(&self) -> Option<&str> {
        self.codename.as_deref()
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version_major)
    }
}

fn parse_fields(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim())))
        .collect()
}

fn unquote(value: &str) -> String {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    stripped.replace("\\\"", "\"")
}

fn capitalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Package manager family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    /// Debian/Ubuntu: apt and `.deb` packages
    Apt,
    /// CentOS: yum and `.rpm` packages
    Yum,
}

impl OsFamily {
    /// Map a normalized distribution name to its family
    pub fn for_distribution(distribution: &Distribution) -> Result<Self, DistributionError> {
        match distribution.name() {
            "Ubuntu" => Ok(Self::Apt),
            "Centos" | "Centos linux" => Ok(Self::Yum),
            other => Err(DistributionError::NotImplemented {
                distribution: other.to_string(),
            }),
        }
    }

    /// Native package file extension
    pub fn package_suffix(&self) -> &'static str {
        match self {
            Self::Apt => "deb",
            Self::Yum => "rpm",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Yum => write!(f, "yum"),
        }
    }
}

/// A distribution resolved to a supported family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    distribution: Distribution,
    family: OsFamily,
}

impl Platform {
    /// Resolve a distribution, failing for unsupported families
    pub fn resolve(distribution: Distribution) -> Result<Self, DistributionError> {
        let family = OsFamily::for_distribution(&distribution)?;
        Ok(Self {
            distribution,
            family,
        })
    }

    /// Detect the host platform from an os-release file
    pub fn detect(os_release: &Path) -> Result<Self, DistributionError> {
        let distribution = Distribution::detect(os_release)?;
        tracing::info!("Detected distribution: {distribution}");
        Self::resolve(distribution)
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn family(&self) -> OsFamily {
        self.family
    }

    /// Native package file extension
    pub fn package_suffix(&self) -> &'static str {
        self.family.package_suffix()
    }

    /// Platform string used for per-platform directories, e.g. `Ubuntu_16`
    pub fn platform_string(&self) -> String {
        format!(
            "{}_{}",
            self.distribution.name(),
            self.distribution.version_major()
        )
    }

    /// `base/<platform string>`
    pub fn os_specific_directory(&self, base: &Path) -> PathBuf {
        base.join(self.platform_string())
    }
}
