//! Error types for logcompat.

use crate::format_version::LogFormatVersion;
use crate::request::Requirement;
use crate::version::Version;
use thiserror::Error;

/// The main error type for logcompat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// On-disk metadata failed validation
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// A version string could not be parsed
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// A compatibility configuration string could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A log version table violates its ordering rules
    #[error("Invalid log version table: {0}")]
    InvalidTable(String),

    /// The requested compatibility settings were rejected
    #[error("Compatibility check failed: {0}")]
    Compatibility(#[from] CompatibilityError),
}

/// A specialized `Result` type for logcompat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons the resolver rejects a compatibility request.
///
/// Every variant is a permanent rejection of the exact request that
/// produced it. Callers should match on [`CompatibilityError::kind`] rather
/// than on the rendered message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatibilityError {
    /// A referenced release has no entry in the log version table.
    #[error("release {version} has no log format mapping")]
    UnknownVersion {
        /// The release that could not be mapped
        version: Version,
    },

    /// A requested release maps to a log format this build cannot write.
    #[error(
        "{requirement} {version} needs log format {log_version}, this build supports up to {known_max}"
    )]
    UnsupportedFutureVersion {
        /// Which setting carried the release
        requirement: Requirement,
        /// The requested release
        version: Version,
        /// Its log format
        log_version: LogFormatVersion,
        /// Newest log format this build implements
        known_max: LogFormatVersion,
    },

    /// `require_max` is older than the release this open would run as
    /// (the requested release, else the active one).
    #[error(
        "require_max {max} (log format {log_max}) is older than the target release {active} (log format {log_active})"
    )]
    MaxBelowActive {
        /// Requested maximum release
        max: Version,
        /// Log format of the maximum
        log_max: LogFormatVersion,
        /// Requested release, else the active release
        active: Version,
        /// Its log format
        log_active: LogFormatVersion,
    },

    /// `require_min` is newer than the release this open would run as
    /// (the requested release, else the active one).
    #[error(
        "require_min {min} (log format {log_min}) is newer than the target release {active} (log format {log_active})"
    )]
    MinAboveActive {
        /// Requested minimum release
        min: Version,
        /// Log format of the minimum
        log_min: LogFormatVersion,
        /// Requested release, else the active release
        active: Version,
        /// Its log format
        log_active: LogFormatVersion,
    },

    /// `require_max` and `require_min` describe an empty range.
    #[error(
        "require_max {max} (log format {log_max}) is older than require_min {min} (log format {log_min})"
    )]
    MaxBelowMin {
        /// Requested maximum release
        max: Version,
        /// Log format of the maximum
        log_max: LogFormatVersion,
        /// Requested minimum release
        min: Version,
        /// Log format of the minimum
        log_min: LogFormatVersion,
    },

    /// `require_max` is older than the release the database was created with.
    #[error(
        "require_max {max} (log format {log_max}) is older than the creation release {creation} (log format {log_create})"
    )]
    MaxBelowCreation {
        /// Requested maximum release
        max: Version,
        /// Log format of the maximum
        log_max: LogFormatVersion,
        /// Creation release
        creation: Version,
        /// Log format the database was created with
        log_create: LogFormatVersion,
    },

    /// `require_min` is newer than the release the database was created with.
    #[error(
        "require_min {min} (log format {log_min}) is newer than the creation release {creation} (log format {log_create})"
    )]
    MinAboveCreation {
        /// Requested minimum release
        min: Version,
        /// Log format of the minimum
        log_min: LogFormatVersion,
        /// Creation release
        creation: Version,
        /// Log format the database was created with
        log_create: LogFormatVersion,
    },
}

/// Field-less discriminant of [`CompatibilityError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompatibilityErrorKind {
    /// See [`CompatibilityError::UnknownVersion`]
    UnknownVersion,
    /// See [`CompatibilityError::UnsupportedFutureVersion`]
    UnsupportedFutureVersion,
    /// See [`CompatibilityError::MaxBelowActive`]
    MaxBelowActive,
    /// See [`CompatibilityError::MinAboveActive`]
    MinAboveActive,
    /// See [`CompatibilityError::MaxBelowMin`]
    MaxBelowMin,
    /// See [`CompatibilityError::MaxBelowCreation`]
    MaxBelowCreation,
    /// See [`CompatibilityError::MinAboveCreation`]
    MinAboveCreation,
}

impl CompatibilityError {
    /// Returns the kind of rejection.
    pub fn kind(&self) -> CompatibilityErrorKind {
        match self {
            CompatibilityError::UnknownVersion { .. } => CompatibilityErrorKind::UnknownVersion,
            CompatibilityError::UnsupportedFutureVersion { .. } => {
                CompatibilityErrorKind::UnsupportedFutureVersion
            }
            CompatibilityError::MaxBelowActive { .. } => CompatibilityErrorKind::MaxBelowActive,
            CompatibilityError::MinAboveActive { .. } => CompatibilityErrorKind::MinAboveActive,
            CompatibilityError::MaxBelowMin { .. } => CompatibilityErrorKind::MaxBelowMin,
            CompatibilityError::MaxBelowCreation { .. } => CompatibilityErrorKind::MaxBelowCreation,
            CompatibilityError::MinAboveCreation { .. } => CompatibilityErrorKind::MinAboveCreation,
        }
    }
}

impl Error {
    /// Returns the compatibility rejection kind, if this error is one.
    pub fn compatibility_kind(&self) -> Option<CompatibilityErrorKind> {
        match self {
            Error::Compatibility(e) => Some(e.kind()),
            _ => None,
        }
    }
}
