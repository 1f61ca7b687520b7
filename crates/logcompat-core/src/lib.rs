//! # logcompat Core
//!
//! Version types, the release to log format table and the compatibility
//! resolver used when a database is opened.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of logcompat.**
//!
//! Users should depend on the main `logcompat` crate instead, which
//! re-exports everything needed to open a database behind the
//! compatibility gate.
//!
//! ```rust
//! use logcompat_core::{resolve, CompatibilityRequest, LogVersionTable, Version};
//!
//! let table = LogVersionTable::builtin();
//! let request = CompatibilityRequest::new(Version::new(3, 0))
//!     .with_active(Version::new(3, 0))
//!     .with_release(Version::new(3, 1));
//!
//! let resolution = resolve(&request, &table).unwrap();
//! assert_eq!(resolution.log_version.get(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod format_version;
pub mod request;
pub mod resolver;
pub mod version;

pub use error::{CompatibilityError, CompatibilityErrorKind, Error, Result};
pub use format_version::{LogFormatVersion, LogVersionTable, TableEntry};
pub use request::{CompatibilityRequest, Requirement};
pub use resolver::{resolve, Resolution};
pub use version::{ReleaseSpec, Version};
