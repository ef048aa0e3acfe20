//! # clocmaplib
//!
//! Turns a flat, per-file line-count report into a directory hierarchy with
//! aggregated counts, ready for a treemap.
//!
//! ## Overview
//!
//! Line counters such as `cloc --by-file` report code, comment and blank
//! lines per file. This library does not count lines itself; it takes that
//! report and:
//!
//! - **Builds a hierarchy** from the slash-separated paths
//! - **Aggregates bottom-up**: every directory sums its descendants
//! - **Flattens** the tree into records with unique ids, even when names
//!   repeat (`mod.rs`, `__init__.py`, ...)
//! - **Presents** the result as parallel columns, a treemap figure
//!   description, or a sorted table
//!
//! ## Pipeline
//!
//! - [`source`]: parse reports, filter paths
//! - [`data`]: counts, path index, hierarchy, flattening
//! - [`query`]: select and order records for listings
//! - [`output`]: columns, figure and table shapes
//!
//! ## Example
//!
//! ```rust
//! use clocmaplib::{analyze, parse_report, AnalyzeOptions, FilterConfig, LineCounts, ReportFormat};
//!
//! let report = "\
//! File                        blank        comment           code
//! ---------------------------------------------------------------
//! repo/x/util.py                  0              0              4
//! repo/y/util.py                  1              2              6
//! repo/setup.py                   0              1              2
//! ---------------------------------------------------------------
//! SUM:                            1              3             12
//! ";
//!
//! let index = parse_report(report, ReportFormat::Auto).unwrap();
//! let options = AnalyzeOptions::new()
//!     .base_path("repo")
//!     .filter(FilterConfig::new().extension(".py"));
//! let treemap = analyze(&index, &options).unwrap();
//!
//! assert_eq!(treemap.total, LineCounts::new(12, 3, 1));
//!
//! // Same display name, distinct ids.
//! assert_eq!(treemap.get("util.py__0").unwrap().parent, "x__0");
//! assert_eq!(treemap.get("util.py__1").unwrap().parent, "y__0");
//!
//! // The root record always comes last.
//! assert_eq!(treemap.root().unwrap().id, "root");
//! ```

pub mod data;
pub mod error;
pub mod output;
pub mod query;
pub mod source;

pub use data::{
    analyze, analyze_bundle, analyze_report, flatten, AnalyzeOptions, FlatRecord, Hierarchy,
    HierarchyNode, IdAllocator, LineCounts, NodeKind, PathIndex, Treemap, ALL_EXTENSIONS,
    DEFAULT_ROOT_LABEL,
};
pub use error::ClocmapError;
pub use output::{NodeTable, TableRow, TreemapColumns, TreemapFigure};
pub use query::{NodeQuerySet, OrderBy, OrderDirection, Ordering, QueryItem, Selection};
pub use source::{parse_report, read_report, FilterConfig, ReportFormat};

/// Result type for clocmaplib operations
pub type Result<T> = std::result::Result<T, ClocmapError>;
