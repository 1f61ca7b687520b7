//! Compatibility metadata file
//!
//! File format (binary):
//! `[magic: u32 LE] [format: u16 LE] [length: u32 LE] [bincode payload] [crc32: u32 LE]`
//!
//! The CRC covers everything before it. The file is replaced atomically:
//! written to `COMPAT.tmp`, synced, then renamed over `COMPAT`.

use crc32fast::Hasher;
use logcompat_core::format_version::{magic, METADATA_FORMAT_VERSION};
use logcompat_core::{Error, LogFormatVersion, Result, Version};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata file name
pub const METADATA_FILE: &str = "COMPAT";
/// Temporary file used while replacing the metadata
const METADATA_TEMP: &str = "COMPAT.tmp";
/// Human-readable summary of the effective compatibility settings
pub const BASE_CONFIG_FILE: &str = "COMPAT.base";

const HEADER_LEN: usize = 4 + 2 + 4;
const CRC_LEN: usize = 4;

/// Release history persisted alongside a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatMetadata {
    /// Release the database was created with. Never changes.
    pub creation_release: Version,
    /// Release of the most recent successful open
    pub active_release: Version,
    /// Log format selected by the most recent successful open
    pub log_version: LogFormatVersion,
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(&bytes[offset..offset + 2]);
    u16::from_le_bytes(buf)
}

impl CompatMetadata {
    /// Encode with header and CRC.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload =
            bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))?;

        let mut buf = Vec::with_capacity(HEADER_LEN + payload.len() + CRC_LEN);
        buf.extend_from_slice(&magic::METADATA.to_le_bytes());
        buf.extend_from_slice(&METADATA_FORMAT_VERSION.to_le_bytes());
        buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&payload);

        let mut hasher = Hasher::new();
        hasher.update(&buf);
        buf.extend_from_slice(&hasher.finalize().to_le_bytes());

        Ok(buf)
    }

    /// Decode and validate bytes produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN + CRC_LEN {
            return Err(Error::Corruption(format!(
                "metadata truncated: {} bytes",
                bytes.len()
            )));
        }

        let found_magic = read_u32(bytes, 0);
        if found_magic != magic::METADATA {
            return Err(Error::Corruption(format!(
                "bad metadata magic: {:#010x}",
                found_magic
            )));
        }

        let format = read_u16(bytes, 4);
        if format != METADATA_FORMAT_VERSION {
            return Err(Error::Corruption(format!(
                "unsupported metadata format {}",
                format
            )));
        }

        let len = read_u32(bytes, 6) as usize;
        let body_end = HEADER_LEN + len;
        if bytes.len() != body_end + CRC_LEN {
            return Err(Error::Corruption(format!(
                "metadata length mismatch: header says {} payload bytes, file has {}",
                len,
                bytes.len()
            )));
        }

        let stored_crc = read_u32(bytes, body_end);
        let mut hasher = Hasher::new();
        hasher.update(&bytes[..body_end]);
        let computed_crc = hasher.finalize();
        if stored_crc != computed_crc {
            return Err(Error::Corruption(format!(
                "metadata CRC mismatch: expected {:#x}, got {:#x}",
                stored_crc, computed_crc
            )));
        }

        bincode::deserialize(&bytes[HEADER_LEN..body_end])
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Reads and writes the metadata file of one database directory.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    dir: PathBuf,
}

impl MetadataStore {
    /// Open the store for `dir`.
    ///
    /// Nothing is touched on disk until the first write, which creates the
    /// directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    /// Database directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the metadata file
    pub fn path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    /// Load the metadata. `Ok(None)` means the database has never been opened.
    pub fn load(&self) -> Result<Option<CompatMetadata>> {
        let path = self.path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no compatibility metadata");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let meta = CompatMetadata::decode(&bytes)?;
        debug!(
            creation = %meta.creation_release,
            active = %meta.active_release,
            log_version = %meta.log_version,
            "loaded compatibility metadata"
        );
        Ok(Some(meta))
    }

    /// Replace the metadata file.
    pub fn store(&self, meta: &CompatMetadata) -> Result<()> {
        let encoded = meta.encode()?;
        let temp_path = self.dir.join(METADATA_TEMP);
        fs::create_dir_all(&self.dir)?;

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&encoded)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, self.path())?;

        debug!(
            active = %meta.active_release,
            log_version = %meta.log_version,
            "stored compatibility metadata"
        );
        Ok(())
    }

    /// Write the human-readable base configuration file.
    pub fn store_base_config(&self, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(BASE_CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Delete the base configuration file. A missing file is not an error.
    pub fn remove_base_config(&self) -> Result<()> {
        match fs::remove_file(self.dir.join(BASE_CONFIG_FILE)) {
            Ok(()) => {
                debug!(dir = %self.dir.display(), "removed base configuration");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the base configuration file, if one was written.
    pub fn load_base_config(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.dir.join(BASE_CONFIG_FILE)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> CompatMetadata {
        CompatMetadata {
            creation_release: Version::new(3, 0),
            active_release: Version::with_patch(2, 6, 1),
            log_version: LogFormatVersion::new(2),
        }
    }

    #[test]
    fn test_load_missing() {
        let dir = tempdir().unwrap();
        let store = MetadataStore::open(dir.path()).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_store_and_reload() {
        let dir = tempdir().unwrap();
        let store = MetadataStore::open(dir.path()).unwrap();
        store.store(&sample()).unwrap();

        let reopened = MetadataStore::open(dir.path()).unwrap();
        let loaded = reopened.load().unwrap().unwrap();
        assert_eq!(loaded, sample());
        // Patch survives persistence even though comparisons ignore it.
        assert_eq!(loaded.active_release.patch(), Some(1));
        assert!(!dir.path().join(METADATA_TEMP).exists());
    }

    #[test]
    fn test_store_overwrites() {
        let dir = tempdir().unwrap();
        let store = MetadataStore::open(dir.path()).unwrap();
        store.store(&sample()).unwrap();

        let updated = CompatMetadata {
            active_release: Version::new(3, 1),
            log_version: LogFormatVersion::new(3),
            ..sample()
        };
        store.store(&updated).unwrap();
        assert_eq!(store.load().unwrap(), Some(updated));
    }

    #[test]
    fn test_crc_mismatch_detected() {
        let mut bytes = sample().encode().unwrap();
        let mid = HEADER_LEN + 1;
        bytes[mid] ^= 0xFF;
        assert!(matches!(
            CompatMetadata::decode(&bytes),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_bad_magic_and_truncation() {
        let bytes = sample().encode().unwrap();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            CompatMetadata::decode(&bad_magic),
            Err(Error::Corruption(_))
        ));

        assert!(matches!(
            CompatMetadata::decode(&bytes[..bytes.len() - 1]),
            Err(Error::Corruption(_))
        ));
        assert!(matches!(
            CompatMetadata::decode(&bytes[..3]),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut bytes = sample().encode().unwrap();
        bytes[4..6].copy_from_slice(&(METADATA_FORMAT_VERSION + 1).to_le_bytes());
        assert!(matches!(
            CompatMetadata::decode(&bytes),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_corrupt_file_surfaces_on_load() {
        let dir = tempdir().unwrap();
        let store = MetadataStore::open(dir.path()).unwrap();
        fs::write(store.path(), b"not metadata at all").unwrap();
        assert!(matches!(store.load(), Err(Error::Corruption(_))));
    }

    #[test]
    fn test_base_config() {
        let dir = tempdir().unwrap();
        let store = MetadataStore::open(dir.path()).unwrap();
        assert!(store.load_base_config().unwrap().is_none());

        store.store_base_config("release=3.0\n").unwrap();
        assert_eq!(store.load_base_config().unwrap().as_deref(), Some("release=3.0\n"));

        store.remove_base_config().unwrap();
        assert!(store.load_base_config().unwrap().is_none());
        // Removing again is a no-op.
        store.remove_base_config().unwrap();
    }

    #[test]
    fn test_directory_created_on_first_write() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("nested").join("db");

        let store = MetadataStore::open(&db).unwrap();
        assert!(!db.exists());
        assert!(store.load().unwrap().is_none());
        assert!(store.load_base_config().unwrap().is_none());
        assert!(!db.exists());

        store.store(&sample()).unwrap();
        assert!(db.is_dir());
        assert_eq!(store.load().unwrap(), Some(sample()));
    }
}
