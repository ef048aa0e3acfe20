//! Table-ready data structures for listings.
//!
//! This module provides `NodeTable`, a presentation-ready data structure
//! that can be printed directly or serialized to JSON.
//!
//! The data flow is:
//! 1. Treemap (flat records)
//! 2. QuerySet (selected, sorted)
//! 3. NodeTable (formatted strings for display)
//!
//! NodeTable is a pure presentation layer: it only formats data.

use serde::{Deserialize, Serialize};

use crate::data::stats::LineCounts;
use crate::query::options::Selection;
use crate::query::queryset::NodeQuerySet;

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (relative path, or "Total (...)")
    pub label: String,
    /// Values for each count column (as strings, ready for display)
    pub values: Vec<String>,
}

/// Table-ready listing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTable {
    /// Optional title (e.g. the report or filter being shown)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers: [label_header, Code, Comments, Blanks, Total, Comment %]
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary/footer row with the root totals
    pub footer: TableRow,
}

impl NodeTable {
    /// Create a NodeTable from a NodeQuerySet.
    pub fn from_queryset(qs: &NodeQuerySet) -> Self {
        let rows = qs
            .items
            .iter()
            .map(|item| TableRow {
                label: item.label.clone(),
                values: format_counts(&item.counts),
            })
            .collect();
        let footer = TableRow {
            label: format!(
                "Total ({} files, {} dirs)",
                qs.file_count, qs.directory_count
            ),
            values: format_counts(&qs.total),
        };

        NodeTable {
            title: None,
            headers: build_headers(qs.selection),
            rows,
            footer,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

fn build_headers(selection: Selection) -> Vec<String> {
    let label_header = match selection {
        Selection::All => "Path",
        Selection::Files => "File",
        Selection::Directories => "Directory",
    };
    [label_header, "Code", "Comments", "Blanks", "Total", "Comment %"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

/// Format counts as display strings, in header order.
fn format_counts(counts: &LineCounts) -> Vec<String> {
    vec![
        counts.code.to_string(),
        counts.comment.to_string(),
        counts.blank.to_string(),
        counts.total().to_string(),
        format_ratio(counts.comment_ratio()),
    ]
}

/// Format a ratio in `[0, 1]` as a percentage with one decimal.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::analyzer::{analyze, AnalyzeOptions};
    use crate::data::index::PathIndex;
    use crate::query::options::{OrderBy, Ordering};

    fn sample_queryset(selection: Selection, ordering: Ordering) -> NodeQuerySet {
        let index: PathIndex = [
            ("lib/a.py", LineCounts::new(30, 10, 10)),
            ("lib/b.py", LineCounts::new(90, 0, 10)),
            ("main.py", LineCounts::new(0, 0, 0)),
        ]
        .into_iter()
        .collect();
        let treemap = analyze(&index, &AnalyzeOptions::new()).unwrap();
        NodeQuerySet::from_treemap(&treemap, selection, ordering, None)
    }

    #[test]
    fn test_headers() {
        let headers = build_headers(Selection::Files);
        assert_eq!(
            headers,
            vec!["File", "Code", "Comments", "Blanks", "Total", "Comment %"]
        );
        assert_eq!(build_headers(Selection::All)[0], "Path");
        assert_eq!(build_headers(Selection::Directories)[0], "Directory");
    }

    #[test]
    fn test_format_counts() {
        let values = format_counts(&LineCounts::new(30, 10, 10));
        assert_eq!(values, vec!["30", "10", "10", "50", "20.0%"]);
    }

    #[test]
    fn test_format_ratio_of_empty_counts() {
        assert_eq!(format_counts(&LineCounts::zero())[4], "0.0%");
    }

    #[test]
    fn test_table_from_queryset() {
        let qs = sample_queryset(Selection::Files, Ordering::by(OrderBy::Code));
        let table = NodeTable::from_queryset(&qs).with_title("demo");

        assert_eq!(table.title.as_deref(), Some("demo"));
        assert_eq!(table.headers[0], "File");
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].label, "lib/b.py");
        assert_eq!(table.rows[0].values[0], "90");
        assert_eq!(table.footer.label, "Total (3 files, 1 dirs)");
        assert_eq!(table.footer.values, vec!["120", "10", "20", "150", "6.7%"]);
    }
}
