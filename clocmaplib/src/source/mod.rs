//! Source intake: read reports and decide which rows to keep.
//!
//! This module handles the first stage of the pipeline. It provides:
//!
//! - **Reports**: parse `cloc --by-file` text or JSON output into a `PathIndex`
//! - **Filtering**: extension substring and exclude glob patterns
//!
//! ## Example
//!
//! ```rust,ignore
//! use clocmaplib::source::{read_report, FilterConfig, ReportFormat};
//!
//! let index = read_report("cloc.txt", ReportFormat::Auto)?;
//! let filter = FilterConfig::new().extension(".py").exclude("vendor/**")?;
//! ```

pub mod filter;
pub mod report;

pub use filter::FilterConfig;
pub use report::{parse_json_report, parse_report, parse_text_report, read_report, ReportFormat};
