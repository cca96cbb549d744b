//! Runtime configuration.
//!
//! # Environment Variables
//!
//! - `TASKTRACK_DEFAULT_PAGE_SIZE`: page size when the caller gives none (default: `10`)
//! - `TASKTRACK_MAX_PAGE_SIZE`: upper bound for any requested page size (default: `100`)

use std::env;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl TrackerConfig {
    /// Read overrides from the environment. Unparseable or zero values are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let max_page_size = read_page_size(&lookup, "TASKTRACK_MAX_PAGE_SIZE").unwrap_or(defaults.max_page_size);
        let default_page_size = read_page_size(&lookup, "TASKTRACK_DEFAULT_PAGE_SIZE")
            .unwrap_or(defaults.default_page_size)
            .min(max_page_size);
        Self {
            default_page_size,
            max_page_size,
        }
    }
}

fn read_page_size(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u32> {
    let raw = lookup(key)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u32>() {
        Ok(0) => {
            tracing::warn!(key, "page size must be > 0, using default");
            None
        }
        Ok(n) => Some(n),
        Err(error) => {
            tracing::warn!(key, value = trimmed, %error, "invalid page size, using default");
            None
        }
    }
}
