//! # logcompat Metadata
//!
//! On-disk record of a database's release history: the release it was
//! created with, the release it last ran as, and the log format in use.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of logcompat.**
//!
//! Users should depend on the main `logcompat` crate instead, which reads
//! and writes this metadata as part of opening a database.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod metadata;

pub use metadata::{CompatMetadata, MetadataStore, BASE_CONFIG_FILE, METADATA_FILE};
