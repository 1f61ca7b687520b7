//! Compatibility resolver.
//!
//! Decides whether the release settings supplied for an open are consistent
//! with the database's history and which log format the open will use.
//! Checks run in a fixed order and the first failure is reported:
//!
//! 1. every referenced release must map through the table
//! 2. `require_min`, `require_max` and `release` must map to a supported format
//! 3. `require_max` may not be older than the release the open will run as
//! 4. `require_min` may not be newer than the release the open will run as
//! 5. `require_max` may not be older than `require_min`
//! 6. `require_max` may not be older than the creation release
//! 7. `require_min` may not be newer than the creation release
//!
//! Comparisons are made on log formats, not on releases, so two releases
//! sharing a format are interchangeable.

use crate::error::CompatibilityError;
use crate::format_version::{LogFormatVersion, LogVersionTable};
use crate::request::{CompatibilityRequest, Requirement};
use crate::version::{ReleaseSpec, Version};

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Log format to use for this open
    pub log_version: LogFormatVersion,
    /// Release to record as active
    pub release: Version,
}

type Mapped = Option<(Version, LogFormatVersion)>;

fn map_spec(table: &LogVersionTable, spec: ReleaseSpec) -> Result<Mapped, CompatibilityError> {
    match spec {
        ReleaseSpec::Set(v) => Ok(Some((v, table.lookup(v)?))),
        ReleaseSpec::Unset => Ok(None),
    }
}

/// Resolves `request` against `table`.
///
/// The effective release is the requested one, else the active one, else
/// the table's default. The effective log format is that release's format,
/// never lower than the format the database was created with.
pub fn resolve(
    request: &CompatibilityRequest,
    table: &LogVersionTable,
) -> Result<Resolution, CompatibilityError> {
    let creation = request.creation_version;
    let log_create = table.lookup(creation)?;
    let active = map_spec(table, request.active_release)?;
    let release = map_spec(table, request.requested_release)?;
    let min = map_spec(table, request.requested_min)?;
    let max = map_spec(table, request.requested_max)?;

    for (requirement, bound) in [
        (Requirement::Min, min),
        (Requirement::Max, max),
        (Requirement::Release, release),
    ] {
        if let Some((version, log_version)) = bound {
            if !table.is_supported(log_version) {
                return Err(CompatibilityError::UnsupportedFutureVersion {
                    requirement,
                    version,
                    log_version,
                    known_max: table.known_max(),
                });
            }
        }
    }

    // The release this open runs as: the requested one, else the active one.
    if let Some((target, log_target)) = release.or(active) {
        if let Some((max, log_max)) = max {
            if log_max < log_target {
                return Err(CompatibilityError::MaxBelowActive {
                    max,
                    log_max,
                    active: target,
                    log_active: log_target,
                });
            }
        }
        if let Some((min, log_min)) = min {
            if log_min > log_target {
                return Err(CompatibilityError::MinAboveActive {
                    min,
                    log_min,
                    active: target,
                    log_active: log_target,
                });
            }
        }
    }

    if let (Some((min, log_min)), Some((max, log_max))) = (min, max) {
        if log_max < log_min {
            return Err(CompatibilityError::MaxBelowMin {
                max,
                log_max,
                min,
                log_min,
            });
        }
    }

    if let Some((max, log_max)) = max {
        if log_max < log_create {
            return Err(CompatibilityError::MaxBelowCreation {
                max,
                log_max,
                creation,
                log_create,
            });
        }
    }

    if let Some((min, log_min)) = min {
        if log_min > log_create {
            return Err(CompatibilityError::MinAboveCreation {
                min,
                log_min,
                creation,
                log_create,
            });
        }
    }

    let (release, log_selected) = release
        .or(active)
        .unwrap_or_else(|| (table.default_release(), table.default_log_version()));

    Ok(Resolution {
        log_version: log_selected.max(log_create),
        release,
    })
}
