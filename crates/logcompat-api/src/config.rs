//! Compatibility configuration.
//!
//! Settings arrive as a comma-separated `key=value` list:
//!
//! ```text
//! release="3.0",require_min=2.6,require_max=none
//! compatibility=(release="3.0"),compatibility=(require_max="3.1")
//! ```
//!
//! `none` (or an empty value) leaves a setting unset. When a key appears
//! more than once the last value wins.

use logcompat_core::{
    CompatibilityRequest, Error, LogVersionTable, ReleaseSpec, Result, Version,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Release settings supplied for one open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityConfig {
    /// Target release for this open
    pub release: ReleaseSpec,
    /// Oldest acceptable release
    pub require_min: ReleaseSpec,
    /// Newest acceptable release
    pub require_max: ReleaseSpec,
}

impl CompatibilityConfig {
    /// All settings unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target release
    pub fn with_release(mut self, release: impl Into<ReleaseSpec>) -> Self {
        self.release = release.into();
        self
    }

    /// Set the minimum release
    pub fn with_require_min(mut self, min: impl Into<ReleaseSpec>) -> Self {
        self.require_min = min.into();
        self
    }

    /// Set the maximum release
    pub fn with_require_max(mut self, max: impl Into<ReleaseSpec>) -> Self {
        self.require_max = max.into();
        self
    }

    /// Parse a configuration string.
    pub fn parse(input: &str) -> Result<Self> {
        let mut config = Self::default();
        for item in split_top_level(input)? {
            let (key, value) = split_key_value(item)?;
            config.apply(key, value, false)?;
        }
        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str, nested: bool) -> Result<()> {
        match key {
            "release" => self.release = value.parse()?,
            "require_min" => self.require_min = value.parse()?,
            "require_max" => self.require_max = value.parse()?,
            "compatibility" if !nested => {
                let inner = value
                    .strip_prefix('(')
                    .and_then(|v| v.strip_suffix(')'))
                    .ok_or_else(|| {
                        Error::InvalidConfig(format!(
                            "compatibility expects a parenthesised list, got {:?}",
                            value
                        ))
                    })?;
                for item in split_top_level(inner)? {
                    let (key, value) = split_key_value(item)?;
                    self.apply(key, value, true)?;
                }
            }
            _ => {
                return Err(Error::InvalidConfig(format!(
                    "unknown compatibility key {:?}",
                    key
                )))
            }
        }
        Ok(())
    }

    /// Build the resolver input for a database with the given history.
    pub fn to_request(&self, creation: Version, active: ReleaseSpec) -> CompatibilityRequest {
        CompatibilityRequest::new(creation)
            .with_active(active)
            .with_release(self.release)
            .with_min(self.require_min)
            .with_max(self.require_max)
    }
}

impl FromStr for CompatibilityConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CompatibilityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "release={},require_min={},require_max={}",
            self.release, self.require_min, self.require_max
        )
    }
}

/// Options for [`Connection::open`](crate::Connection::open).
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Release settings for this open
    pub compatibility: CompatibilityConfig,
    /// Release to log format table
    pub table: LogVersionTable,
    /// Write the readable `COMPAT.base` summary after a successful open
    pub write_base_config: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            compatibility: CompatibilityConfig::default(),
            table: LogVersionTable::builtin(),
            write_base_config: true,
        }
    }
}

impl OpenOptions {
    /// Parse a connection string.
    ///
    /// Accepts everything [`CompatibilityConfig::parse`] does plus
    /// `config_base=true|false`.
    pub fn parse(input: &str) -> Result<Self> {
        let mut options = Self::default();
        for item in split_top_level(input)? {
            let (key, value) = split_key_value(item)?;
            if key == "config_base" {
                options.write_base_config = match value.trim_matches('"') {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(Error::InvalidConfig(format!(
                            "config_base expects true or false, got {:?}",
                            other
                        )))
                    }
                };
            } else {
                options.compatibility.apply(key, value, false)?;
            }
        }
        Ok(options)
    }

    /// Set the compatibility settings
    pub fn with_compatibility(mut self, compatibility: CompatibilityConfig) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Set the log version table
    pub fn with_table(mut self, table: LogVersionTable) -> Self {
        self.table = table;
        self
    }

    /// Enable or disable the base config summary
    pub fn with_base_config(mut self, enabled: bool) -> Self {
        self.write_base_config = enabled;
        self
    }
}

/// Split on commas that are outside quotes and parentheses. Empty items
/// are dropped.
fn split_top_level(input: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::InvalidConfig(format!("unbalanced ')' in {:?}", input))
                })?;
            }
            ',' if !in_quotes && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes || depth != 0 {
        return Err(Error::InvalidConfig(format!(
            "unterminated quote or parenthesis in {:?}",
            input
        )));
    }
    parts.push(&input[start..]);

    Ok(parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect())
}

fn split_key_value(item: &str) -> Result<(&str, &str)> {
    item.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .ok_or_else(|| Error::InvalidConfig(format!("expected key=value, got {:?}", item)))
}
