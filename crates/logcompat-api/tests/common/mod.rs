// Common test utilities for compatibility gate integration tests

use logcompat::{
    CompatibilityConfig, Connection, LogFormatVersion, LogVersionTable, OpenOptions, Result,
    Version,
};
use std::path::PathBuf;
use tempfile::TempDir;

/// Log format of the 5.0 release: newer than anything this build writes
#[allow(dead_code)]
pub const FUTURE_LOGV: u16 = 5;

/// Builtin releases plus a 5.0 release that needs an unimplemented format.
pub fn table_with_future() -> LogVersionTable {
    LogVersionTable::new(
        [
            (Version::new(2, 6), LogFormatVersion::new(1)),
            (Version::new(3, 0), LogFormatVersion::new(2)),
            (Version::new(3, 1), LogFormatVersion::new(3)),
            (Version::new(5, 0), LogFormatVersion::new(FUTURE_LOGV)),
        ],
        LogFormatVersion::new(3),
    )
    .expect("Failed to build table")
}

/// Test fixture that owns a temporary database directory
pub struct DbFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
}

impl DbFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("db");
        Self { temp_dir, db_path }
    }

    /// Open with the future-aware table and the given settings.
    pub fn open(&self, compatibility: CompatibilityConfig, base_config: bool) -> Result<Connection> {
        let options = OpenOptions::default()
            .with_table(table_with_future())
            .with_compatibility(compatibility)
            .with_base_config(base_config);
        Connection::open(&self.db_path, &options)
    }

    /// Open with a connection string and the future-aware table.
    #[allow(dead_code)]
    pub fn open_str(&self, config: &str) -> Result<Connection> {
        let options = OpenOptions::parse(config)?.with_table(table_with_future());
        Connection::open(&self.db_path, &options)
    }
}

impl Default for DbFixture {
    fn default() -> Self {
        Self::new()
    }
}
