//! Data model and aggregation.
//!
//! This module handles the second stage of the pipeline: turning a flat
//! path index into an aggregated hierarchy. It provides:
//!
//! - **Statistics**: `LineCounts`, the `(code, comment, blank)` triple
//! - **Index**: `PathIndex`, the ordered path to counts mapping
//! - **Hierarchy**: the directory tree built from report paths
//! - **Flattening**: bottom-up sums and collision-free treemap records
//! - **Analysis**: the high-level `analyze` entry points
//!
//! ## Example
//!
//! ```rust,ignore
//! use clocmaplib::data::{analyze, AnalyzeOptions};
//!
//! let treemap = analyze(&index, &AnalyzeOptions::new().base_path("../repo"))?;
//! println!("Total code lines: {}", treemap.total.code);
//! ```

pub mod analyzer;
pub mod flatten;
pub mod hierarchy;
pub mod index;
pub mod stats;

pub use analyzer::{analyze, analyze_bundle, analyze_report, AnalyzeOptions, ALL_EXTENSIONS};
pub use flatten::{flatten, FlatRecord, IdAllocator, NodeKind, Treemap, DEFAULT_ROOT_LABEL};
pub use hierarchy::{Hierarchy, HierarchyNode};
pub use index::PathIndex;
pub use stats::LineCounts;
