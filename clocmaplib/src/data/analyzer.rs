//! High-level analysis API.
//!
//! This module provides the main entry points: build the hierarchy for a
//! [`PathIndex`] and flatten it into a [`Treemap`], optionally straight from
//! a report file, and optionally for several extension filters at once.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;

use crate::source::filter::FilterConfig;
use crate::source::report::{read_report, ReportFormat};
use crate::Result;

use super::flatten::{flatten, Treemap, DEFAULT_ROOT_LABEL};
use super::hierarchy::Hierarchy;
use super::index::PathIndex;

/// Extension key that stands for "no extension filter" in a bundle.
pub const ALL_EXTENSIONS: &str = "*";

/// Options for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Path prefix shared by every report path (empty if paths are relative)
    pub base_path: String,
    /// Which report paths to keep
    pub filter: FilterConfig,
    /// Id and name of the synthetic root record
    pub root_label: String,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            filter: FilterConfig::new(),
            root_label: DEFAULT_ROOT_LABEL.to_string(),
        }
    }
}

impl AnalyzeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base path stripped from report paths.
    pub fn base_path(mut self, base: impl Into<String>) -> Self {
        self.base_path = base.into();
        self
    }

    /// Set the path filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Set the root label.
    ///
    /// The label must be non-empty and must not look like a generated id
    /// (`name__3`); [`analyze`] rejects it with
    /// [`ClocmapError::InvalidRootLabel`](crate::ClocmapError::InvalidRootLabel).
    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }
}

/// Build and flatten the hierarchy of `index`.
///
/// # Example
///
/// ```rust
/// use clocmaplib::{analyze, AnalyzeOptions, LineCounts, PathIndex};
///
/// let index: PathIndex = [
///     ("a/b.py", LineCounts::new(10, 2, 1)),
///     ("a/c.py", LineCounts::new(5, 0, 0)),
///     ("d.py", LineCounts::new(3, 1, 0)),
/// ]
/// .into_iter()
/// .collect();
///
/// let treemap = analyze(&index, &AnalyzeOptions::new()).unwrap();
/// assert_eq!(treemap.total, LineCounts::new(18, 3, 1));
/// assert_eq!(treemap.get("a__0").unwrap().counts, LineCounts::new(15, 2, 1));
/// ```
pub fn analyze(index: &PathIndex, options: &AnalyzeOptions) -> Result<Treemap> {
    let hierarchy = Hierarchy::build(index, &options.base_path, &options.filter)?;
    debug!(
        "Hierarchy for extension '{}' has {} files in {} directories",
        options.filter.label(),
        hierarchy.file_count(),
        hierarchy.directory_count()
    );
    flatten(&hierarchy, index, &options.root_label)
}

/// Read a report file and analyze it.
pub fn analyze_report(
    path: impl AsRef<Path>,
    format: ReportFormat,
    options: &AnalyzeOptions,
) -> Result<Treemap> {
    let index = read_report(path, format)?;
    analyze(&index, options)
}

/// Analyze the same index once per extension filter.
///
/// Each key of the result is the extension as given; [`ALL_EXTENSIONS`]
/// runs without an extension filter. Exclude patterns from `options` apply
/// to every run.
pub fn analyze_bundle(
    index: &PathIndex,
    options: &AnalyzeOptions,
    extensions: &[String],
) -> Result<BTreeMap<String, Treemap>> {
    let mut bundle = BTreeMap::new();

    for ext in extensions {
        let mut filter = options.filter.clone();
        filter.extension = if ext == ALL_EXTENSIONS {
            None
        } else {
            Some(ext.clone())
        };
        let run = options.clone().filter(filter);
        bundle.insert(ext.clone(), analyze(index, &run)?);
    }

    debug!("Built treemap bundle for {} extension filters", bundle.len());
    Ok(bundle)
}
