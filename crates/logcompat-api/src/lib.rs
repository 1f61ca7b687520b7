//! # logcompat
//!
//! Compatibility gate for an embedded storage engine. At open time it
//! checks the requested compatibility release and bounds against the
//! release the database was created with and the release it last ran as,
//! then selects the on-disk log format the open will use.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logcompat::{Connection, OpenOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create the database at release 3.0
//!     let options = OpenOptions::parse("compatibility=(release=\"3.0\")")?;
//!     Connection::open("./my_database", &options)?.close()?;
//!
//!     // A maximum older than the creation release is refused
//!     let options = OpenOptions::parse("compatibility=(require_max=\"2.6\")")?;
//!     assert!(Connection::open("./my_database", &options).is_err());
//!
//!     // Upgrading to 3.1 switches to log format 3
//!     let options = OpenOptions::parse("compatibility=(release=\"3.1\")")?;
//!     let conn = Connection::open("./my_database", &options)?;
//!     assert_eq!(conn.log_version().get(), 3);
//!     Ok(())
//! }
//! ```
//!
//! The resolver itself is pure and can be used without touching disk:
//!
//! ```rust
//! use logcompat::{resolve, CompatibilityErrorKind, CompatibilityRequest, LogVersionTable, Version};
//!
//! let request = CompatibilityRequest::new(Version::new(3, 0))
//!     .with_active(Version::new(3, 0))
//!     .with_min(Version::new(3, 1));
//! let err = resolve(&request, &LogVersionTable::builtin()).unwrap_err();
//! assert_eq!(err.kind(), CompatibilityErrorKind::MinAboveActive);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod gate;
pub mod logging;

// Re-export core types
pub use logcompat_core::{
    resolve, CompatibilityError, CompatibilityErrorKind, CompatibilityRequest, Error,
    LogFormatVersion, LogVersionTable, ReleaseSpec, Requirement, Resolution, Result, TableEntry,
    Version,
};

// Metadata components
pub use logcompat_meta::{CompatMetadata, MetadataStore, METADATA_FILE};

pub use config::{CompatibilityConfig, OpenOptions};
pub use gate::Connection;

// Version information
/// Version of the logcompat crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
