//! Query processing: select and sort treemap records for listings.
//!
//! This module handles the third stage of the pipeline. It provides:
//!
//! - **Options**: which records to list and how to order them
//! - **QuerySet**: selected, sorted records ready for presentation
//!
//! ## Example
//!
//! ```rust,ignore
//! use clocmaplib::query::{NodeQuerySet, OrderBy, Ordering, Selection};
//!
//! let queryset = NodeQuerySet::from_treemap(
//!     &treemap,
//!     Selection::Files,
//!     Ordering::by(OrderBy::CommentRatio),
//!     Some(20),
//! );
//! ```

pub mod options;
pub mod queryset;

pub use options::{OrderBy, OrderDirection, Ordering, Selection};
pub use queryset::{NodeQuerySet, QueryItem};
