//! The input to one resolution.

use crate::version::{ReleaseSpec, Version};
use std::fmt;

/// Which compatibility setting a release came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// `release`: the target release for this open
    Release,
    /// `require_min`: oldest acceptable release
    Min,
    /// `require_max`: newest acceptable release
    Max,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Requirement::Release => "release",
            Requirement::Min => "require_min",
            Requirement::Max => "require_max",
        })
    }
}

/// Everything the resolver needs to judge one open attempt.
///
/// Built by the caller once per open, consumed by a single
/// [`resolve`](crate::resolve) call, then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityRequest {
    /// Release recorded when the database was created
    pub creation_version: Version,
    /// Release the database last ran as; unset on the creation open
    pub active_release: ReleaseSpec,
    /// Release requested for this open
    pub requested_release: ReleaseSpec,
    /// Inclusive lower bound
    pub requested_min: ReleaseSpec,
    /// Inclusive upper bound
    pub requested_max: ReleaseSpec,
}

impl CompatibilityRequest {
    /// A request with no active release and no requested settings.
    pub fn new(creation_version: Version) -> Self {
        Self {
            creation_version,
            active_release: ReleaseSpec::Unset,
            requested_release: ReleaseSpec::Unset,
            requested_min: ReleaseSpec::Unset,
            requested_max: ReleaseSpec::Unset,
        }
    }

    /// Set the active release
    pub fn with_active(mut self, active: impl Into<ReleaseSpec>) -> Self {
        self.active_release = active.into();
        self
    }

    /// Set the requested release
    pub fn with_release(mut self, release: impl Into<ReleaseSpec>) -> Self {
        self.requested_release = release.into();
        self
    }

    /// Set the minimum bound
    pub fn with_min(mut self, min: impl Into<ReleaseSpec>) -> Self {
        self.requested_min = min.into();
        self
    }

    /// Set the maximum bound
    pub fn with_max(mut self, max: impl Into<ReleaseSpec>) -> Self {
        self.requested_max = max.into();
        self
    }

    /// True if any of release, minimum or maximum was supplied.
    pub fn has_constraints(&self) -> bool {
        self.requested_release.is_set() || self.requested_min.is_set() || self.requested_max.is_set()
    }
}
