//! Open-time compatibility gate.
//!
//! Reads the database's release history, runs the resolver against the
//! requested settings and, only if the request is accepted, records the
//! new active release and log format.

use crate::config::{CompatibilityConfig, OpenOptions};
use logcompat_core::{resolve, LogFormatVersion, ReleaseSpec, Result, Version};
use logcompat_meta::{CompatMetadata, MetadataStore};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A database directory that passed the compatibility gate.
///
/// # Examples
///
/// ```rust,no_run
/// use logcompat::{CompatibilityConfig, Connection, OpenOptions, Version};
///
/// let options = OpenOptions::default()
///     .with_compatibility(CompatibilityConfig::new().with_release(Version::new(3, 0)));
/// let conn = Connection::open("./my_database", &options)?;
/// assert_eq!(conn.log_version().get(), 2);
/// conn.close()?;
/// # Ok::<(), logcompat::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Connection {
    path: PathBuf,
    metadata: CompatMetadata,
    created: bool,
}

impl Connection {
    /// Opens (or creates) the database at `path` under the given settings.
    ///
    /// On the first open the requested release, or the table default,
    /// becomes the creation release. A rejected request leaves the disk
    /// untouched (a new database's directory is not even created) and
    /// returns [`Error::Compatibility`](crate::Error::Compatibility).
    ///
    /// With base config writing disabled, any base config file left by an
    /// earlier open is removed.
    pub fn open<P: AsRef<Path>>(path: P, options: &OpenOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let store = MetadataStore::open(&path)?;
        let config = &options.compatibility;

        let existing = store.load()?;
        let created = existing.is_none();
        let (creation, active) = match existing {
            Some(meta) => (meta.creation_release, ReleaseSpec::Set(meta.active_release)),
            None => (
                config
                    .release
                    .version()
                    .unwrap_or_else(|| options.table.default_release()),
                ReleaseSpec::Unset,
            ),
        };

        let request = config.to_request(creation, active);
        debug!(?request, "resolving compatibility");

        let resolution = resolve(&request, &options.table).map_err(|e| {
            warn!(path = %path.display(), kind = ?e.kind(), "open rejected: {}", e);
            e
        })?;

        let metadata = CompatMetadata {
            creation_release: creation,
            active_release: resolution.release,
            log_version: resolution.log_version,
        };
        store.store(&metadata)?;
        if options.write_base_config {
            store.store_base_config(&base_config_text(&metadata, config))?;
        } else {
            // A file left by an earlier open would describe other settings.
            store.remove_base_config()?;
        }

        info!(
            path = %path.display(),
            created,
            release = %metadata.active_release,
            log_version = %metadata.log_version,
            "database opened"
        );

        Ok(Self {
            path,
            metadata,
            created,
        })
    }

    /// Log format to use for log I/O on this connection.
    pub fn log_version(&self) -> LogFormatVersion {
        self.metadata.log_version
    }

    /// Effective release recorded for this open.
    pub fn release(&self) -> Version {
        self.metadata.active_release
    }

    /// Release the database was created with.
    pub fn creation_release(&self) -> Version {
        self.metadata.creation_release
    }

    /// True if this open created the database.
    pub fn created(&self) -> bool {
        self.created
    }

    /// Database directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The metadata written by this open.
    pub fn metadata(&self) -> &CompatMetadata {
        &self.metadata
    }

    /// Close the connection.
    pub fn close(self) -> Result<()> {
        debug!(path = %self.path.display(), "database closed");
        Ok(())
    }
}

fn base_config_text(metadata: &CompatMetadata, config: &CompatibilityConfig) -> String {
    format!(
        "# logcompat base configuration\n\
         creation_release={}\n\
         release={}\n\
         log_version={}\n\
         require_min={}\n\
         require_max={}\n",
        metadata.creation_release,
        metadata.active_release,
        metadata.log_version,
        config.require_min,
        config.require_max,
    )
}
