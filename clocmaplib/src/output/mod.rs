//! Output shaping: present treemaps to renderers and people.
//!
//! This module handles the fourth and final stage of the pipeline. It
//! provides:
//!
//! - **TreemapColumns**: parallel arrays (ids, names, parents, counts)
//! - **TreemapFigure**: a plotly-style treemap description
//! - **NodeTable**: headers, rows and footer for listings
//!
//! ## Example
//!
//! ```rust,ignore
//! use clocmaplib::output::{NodeTable, TreemapColumns, TreemapFigure};
//!
//! let columns = TreemapColumns::from(&treemap);
//! let figure = TreemapFigure::from_treemap(&treemap, Some("my-repo".into()));
//! let table = NodeTable::from_queryset(&queryset);
//! ```

pub mod columns;
pub mod figure;
pub mod table;

pub use columns::TreemapColumns;
pub use figure::{tile_value, TreemapFigure, COMMENT_RATIO_RANGE};
pub use table::{format_ratio, NodeTable, TableRow};
