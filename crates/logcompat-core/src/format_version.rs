//! Log format versions and the release to log format table.
//!
//! The table is append-only knowledge of the engine: each new release that
//! changes the log layout adds a higher entry. Releases between two entries
//! share the lower entry's log format.

use crate::error::{CompatibilityError, Error, Result};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compatibility metadata file format version
pub const METADATA_FORMAT_VERSION: u16 = 1;

/// Magic numbers for file validation
pub mod magic {
    /// Compatibility metadata magic: "LCMP" (LogCoMPat)
    pub const METADATA: u32 = 0x4C434D50;
}

/// Release/log-format pairs known to this build, oldest first.
const BUILTIN_ENTRIES: [(u32, u32, u16); 3] = [(2, 6, 1), (3, 0, 2), (3, 1, 3)];

/// Newest log format this build can read and write.
pub const BUILTIN_KNOWN_MAX: u16 = 3;

/// On-disk log format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogFormatVersion(u16);

impl LogFormatVersion {
    /// Wraps a raw log format number.
    pub const fn new(version: u16) -> Self {
        Self(version)
    }

    /// The raw log format number.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<u16> for LogFormatVersion {
    fn from(version: u16) -> Self {
        Self(version)
    }
}

impl fmt::Display for LogFormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of a [`LogVersionTable`]: releases from `release` up to the next
/// row write `log_version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    /// First release using this log format
    pub release: Version,
    /// Log format written by that release
    pub log_version: LogFormatVersion,
}

/// Release to log format mapping plus the newest format this build supports.
#[derive(Debug, Clone)]
pub struct LogVersionTable {
    entries: Vec<TableEntry>,
    known_max: LogFormatVersion,
    // Index of the newest entry whose format is supported.
    default_index: usize,
}

impl LogVersionTable {
    /// Builds a table from `(release, log_version)` pairs, oldest first.
    ///
    /// Releases must be strictly increasing, log versions non-decreasing,
    /// and at least one entry must be within `known_max`. Entries beyond
    /// `known_max` describe releases this build does not implement yet.
    pub fn new(
        entries: impl IntoIterator<Item = (Version, LogFormatVersion)>,
        known_max: LogFormatVersion,
    ) -> Result<Self> {
        let entries: Vec<TableEntry> = entries
            .into_iter()
            .map(|(release, log_version)| TableEntry {
                release,
                log_version,
            })
            .collect();

        if entries.is_empty() {
            return Err(Error::InvalidTable("table has no entries".to_string()));
        }

        for pair in entries.windows(2) {
            if pair[0].release >= pair[1].release {
                return Err(Error::InvalidTable(format!(
                    "releases must be strictly increasing: {} then {}",
                    pair[0].release, pair[1].release
                )));
            }
            if pair[0].log_version > pair[1].log_version {
                return Err(Error::InvalidTable(format!(
                    "log format decreases from {} ({}) to {} ({})",
                    pair[0].log_version, pair[0].release, pair[1].log_version, pair[1].release
                )));
            }
        }

        let default_index = entries
            .iter()
            .rposition(|e| e.log_version <= known_max)
            .ok_or_else(|| {
                Error::InvalidTable(format!("no entry is within known max {}", known_max))
            })?;

        Ok(Self {
            entries,
            known_max,
            default_index,
        })
    }

    /// The table compiled into this build.
    pub fn builtin() -> Self {
        let entries: Vec<TableEntry> = BUILTIN_ENTRIES
            .iter()
            .map(|&(major, minor, log)| TableEntry {
                release: Version::new(major, minor),
                log_version: LogFormatVersion::new(log),
            })
            .collect();
        let default_index = entries.len() - 1;

        Self {
            entries,
            known_max: LogFormatVersion::new(BUILTIN_KNOWN_MAX),
            default_index,
        }
    }

    /// Maps a release to its log format.
    ///
    /// Releases older than the first entry or newer than the last one have
    /// no mapping.
    pub fn lookup(
        &self,
        version: Version,
    ) -> std::result::Result<LogFormatVersion, CompatibilityError> {
        let unknown = CompatibilityError::UnknownVersion { version };

        match self.entries.last() {
            Some(last) if version > last.release => return Err(unknown),
            None => return Err(unknown),
            _ => {}
        }

        let idx = self.entries.partition_point(|e| e.release <= version);
        if idx == 0 {
            return Err(unknown);
        }
        Ok(self.entries[idx - 1].log_version)
    }

    /// Whether this build can write `log_version`.
    #[inline]
    pub fn is_supported(&self, log_version: LogFormatVersion) -> bool {
        log_version <= self.known_max
    }

    /// Newest log format this build implements.
    #[inline]
    pub fn known_max(&self) -> LogFormatVersion {
        self.known_max
    }

    /// Release used when none is requested or recorded.
    pub fn default_release(&self) -> Version {
        self.entries[self.default_index].release
    }

    /// Log format of [`default_release`](Self::default_release).
    pub fn default_log_version(&self) -> LogFormatVersion {
        self.entries[self.default_index].log_version
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }
}

impl Default for LogVersionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
