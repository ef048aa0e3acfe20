//! Report path filtering.
//!
//! Two independent filters decide which report rows reach the hierarchy:
//!
//! - an **extension** filter, which is a plain substring test on the full
//!   report path (so `".py"` also keeps `notpy.pyx`)
//! - **exclude** glob patterns, tested against the path relative to the base

use glob::Pattern;

use crate::error::ClocmapError;
use crate::Result;

/// Configuration for report path filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Substring a path must contain to be kept (`None` keeps everything)
    pub extension: Option<String>,
    /// Glob patterns whose matches are dropped
    pub exclude: Vec<Pattern>,
}

impl FilterConfig {
    /// Create a new filter config that keeps every path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only paths containing `ext` anywhere.
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        let pat = Pattern::new(pattern).map_err(|e| ClocmapError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        self.exclude.push(pat);
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern)?;
        }
        Ok(self)
    }

    /// Whether the full report path passes the extension filter.
    pub fn keeps_extension(&self, path: &str) -> bool {
        match &self.extension {
            Some(ext) => path.contains(ext.as_str()),
            None => true,
        }
    }

    /// Whether a base-relative path matches any exclude pattern.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.matches(relative))
    }

    /// Label used when this filter keys an entry in a bundle.
    pub fn label(&self) -> &str {
        self.extension.as_deref().unwrap_or("*")
    }
}
