use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use thiserror::Error;

/// First run of at least two dot-separated ASCII numeric components.
static VERSION_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?:\.[0-9]+)+").expect("version run pattern should compile")
});

/// A `major.minor.patch[.revision]` version pulled out of a free-form release
/// tag.
///
/// Never carries pre-release or build metadata, so ordering is the plain
/// componentwise numeric order. A missing revision is `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedVersion {
    version: Version,
    revision: u64,
}

impl NormalizedVersion {
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self::with_revision(major, minor, patch, 0)
    }

    #[must_use]
    pub fn with_revision(major: u64, minor: u64, patch: u64, revision: u64) -> Self {
        Self {
            version: Version::new(major, minor, patch),
            revision,
        }
    }

    #[must_use]
    pub fn major(&self) -> u64 {
        self.version.major
    }

    #[must_use]
    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    #[must_use]
    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Ord for NormalizedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then(self.revision.cmp(&other.revision))
    }
}

impl PartialOrd for NormalizedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Version {
            major,
            minor,
            patch,
            ..
        } = &self.version;
        write!(f, "{major}.{minor}.{patch}")?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionTagError {
    #[error("no version found in {tag:?}")]
    NoVersionFound { tag: String },
    #[error("version {run:?} has {count} components, expected 2 to 4")]
    UnsupportedComponentCount { run: String, count: usize },
    #[error("version component {value:?} is out of range")]
    ComponentOutOfRange { value: String },
}

/// Extract a normalized version from a release tag or manifest version string.
///
/// `v1.2` becomes `1.2.0`, `Core-2.10.5-beta` becomes `2.10.5` and `1.2.3.4`
/// keeps its revision.
///
/// # Errors
/// Returns an error when the input has no dotted numeric run, when the run
/// has more than four components, or when a component overflows `u64`.
pub fn extract_version(tag: &str) -> Result<NormalizedVersion, VersionTagError> {
    let run = VERSION_RUN
        .find(tag)
        .ok_or_else(|| VersionTagError::NoVersionFound {
            tag: tag.to_string(),
        })?
        .as_str();

    let mut components = [0_u64; 4];
    let mut count = 0;
    for part in run.split('.') {
        if count == components.len() {
            return Err(VersionTagError::UnsupportedComponentCount {
                run: run.to_string(),
                count: run.split('.').count(),
            });
        }
        components[count] = part
            .parse()
            .map_err(|_| VersionTagError::ComponentOutOfRange {
                value: part.to_string(),
            })?;
        count += 1;
    }

    // Missing patch and revision stay at the zeroed default.
    let [major, minor, patch, revision] = components;
    Ok(NormalizedVersion::with_revision(major, minor, patch, revision))
}

/// Outcome of normalizing a version string, with the unparseable case kept
/// visible for the "install anyway" fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionTag {
    Valid(NormalizedVersion),
    Unparseable { raw: String, error: VersionTagError },
}

impl VersionTag {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match extract_version(raw) {
            Ok(version) => Self::Valid(version),
            Err(error) => Self::Unparseable {
                raw: raw.to_string(),
                error,
            },
        }
    }

    #[must_use]
    pub fn as_valid(&self) -> Option<&NormalizedVersion> {
        match self {
            Self::Valid(version) => Some(version),
            Self::Unparseable { .. } => None,
        }
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(version) => write!(f, "{version}"),
            Self::Unparseable { raw, .. } => write!(f, "{raw:?} (unparseable)"),
        }
    }
}

/// `true` only when `candidate` orders strictly after `current`.
#[must_use]
pub fn is_newer(candidate: &NormalizedVersion, current: &NormalizedVersion) -> bool {
    candidate > current
}
