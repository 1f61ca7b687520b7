//! Release versions and the Set/Unset release setting.
//!
//! Only the major and minor components take part in comparisons. The patch
//! component is kept so a version renders the way it was written, but
//! `2.6` and `2.6.1` are the same release as far as compatibility goes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A release version, `major.minor[.patch]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: Option<u32>,
}

impl Version {
    /// Creates a `major.minor` version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Creates a `major.minor.patch` version.
    pub const fn with_patch(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// Major component.
    #[inline]
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor component.
    #[inline]
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Patch component, if one was supplied.
    #[inline]
    pub fn patch(&self) -> Option<u32> {
        self.patch
    }

    /// The same release with the patch component dropped.
    pub fn without_patch(&self) -> Self {
        Self::new(self.major, self.minor)
    }

    #[inline]
    fn release_key(&self) -> (u32, u32) {
        (self.major, self.minor)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.release_key() == other.release_key()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.release_key().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release_key().cmp(&other.release_key())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

fn parse_component(part: &str, input: &str) -> Result<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidVersion(format!(
            "bad component {:?} in {:?}",
            part, input
        )));
    }
    part.parse::<u32>()
        .map_err(|e| Error::InvalidVersion(format!("{:?}: {}", input, e)))
}

impl FromStr for Version {
    type Err = Error;

    /// Parses `major.minor` or `major.minor.patch`, optionally wrapped in
    /// double quotes.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(trimmed);

        let parts: Vec<&str> = unquoted.split('.').collect();
        match parts.as_slice() {
            [major, minor] => Ok(Version::new(
                parse_component(major, s)?,
                parse_component(minor, s)?,
            )),
            [major, minor, patch] => Ok(Version::with_patch(
                parse_component(major, s)?,
                parse_component(minor, s)?,
                parse_component(patch, s)?,
            )),
            _ => Err(Error::InvalidVersion(format!(
                "expected major.minor[.patch], got {:?}",
                s
            ))),
        }
    }
}

/// A release setting that is either a concrete version or not supplied.
///
/// `Unset` takes part in no ordering; a check gated on an unset setting is
/// skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReleaseSpec {
    /// A concrete release
    Set(Version),
    /// No value supplied
    #[default]
    Unset,
}

impl ReleaseSpec {
    /// Returns true if a release was supplied.
    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, ReleaseSpec::Set(_))
    }

    /// The supplied release, if any.
    #[inline]
    pub fn version(&self) -> Option<Version> {
        match self {
            ReleaseSpec::Set(v) => Some(*v),
            ReleaseSpec::Unset => None,
        }
    }

    /// Returns `self` if set, otherwise `other`.
    pub fn or(self, other: ReleaseSpec) -> ReleaseSpec {
        match self {
            ReleaseSpec::Set(_) => self,
            ReleaseSpec::Unset => other,
        }
    }
}

impl From<Version> for ReleaseSpec {
    fn from(v: Version) -> Self {
        ReleaseSpec::Set(v)
    }
}

impl From<Option<Version>> for ReleaseSpec {
    fn from(v: Option<Version>) -> Self {
        v.map_or(ReleaseSpec::Unset, ReleaseSpec::Set)
    }
}

impl fmt::Display for ReleaseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseSpec::Set(v) => v.fmt(f),
            ReleaseSpec::Unset => f.write_str("none"),
        }
    }
}

impl FromStr for ReleaseSpec {
    type Err = Error;

    /// Like [`Version::from_str`], with `none` and the empty string meaning
    /// [`ReleaseSpec::Unset`].
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_matches('"');
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(ReleaseSpec::Unset);
        }
        s.parse::<Version>().map(ReleaseSpec::Set)
    }
}
