//! Query set: treemap records prepared for a listing.
//!
//! A QuerySet sits between the flattened treemap and the final table:
//! - Filtered to the requested kinds of records
//! - Sorted according to the ordering preference
//! - Optionally cut to the first N rows
//!
//! The data pipeline is:
//! 1. Treemap (flat records, root last)
//! 2. QuerySet (selected, sorted, limited)
//! 3. NodeTable (formatted strings for display)

use std::cmp::Ordering as CmpOrdering;

use serde::{Deserialize, Serialize};

use crate::data::flatten::{FlatRecord, NodeKind, Treemap};
use crate::data::stats::LineCounts;

use super::options::{OrderBy, OrderDirection, Ordering, Selection};

/// A single item in a query set (one row of data before string formatting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryItem {
    /// Path relative to the base
    pub label: String,
    /// File or directory
    pub kind: NodeKind,
    /// Line counts
    pub counts: LineCounts,
}

impl QueryItem {
    fn from_record(record: &FlatRecord) -> Self {
        QueryItem {
            label: record.path.clone(),
            kind: record.kind,
            counts: record.counts,
        }
    }
}

/// Query set over a treemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeQuerySet {
    /// Kinds of record included
    pub selection: Selection,
    /// Data rows (selected, sorted, limited)
    pub items: Vec<QueryItem>,
    /// Root totals
    pub total: LineCounts,
    /// Number of files in the treemap
    pub file_count: usize,
    /// Number of directories in the treemap
    pub directory_count: usize,
}

impl NodeQuerySet {
    /// Create a QuerySet from a Treemap.
    pub fn from_treemap(
        treemap: &Treemap,
        selection: Selection,
        ordering: Ordering,
        limit: Option<usize>,
    ) -> Self {
        let mut items: Vec<QueryItem> = treemap
            .records
            .iter()
            .filter(|r| is_selected(r.kind, selection))
            .map(QueryItem::from_record)
            .collect();

        sort_items(&mut items, ordering);
        if let Some(limit) = limit {
            items.truncate(limit);
        }

        NodeQuerySet {
            selection,
            items,
            total: treemap.total,
            file_count: treemap.file_count(),
            directory_count: treemap.directory_count(),
        }
    }
}

fn is_selected(kind: NodeKind, selection: Selection) -> bool {
    match (selection, kind) {
        (_, NodeKind::Root) => false,
        (Selection::All, _) => true,
        (Selection::Files, kind) => kind == NodeKind::File,
        (Selection::Directories, kind) => kind == NodeKind::Directory,
    }
}

fn sort_items(items: &mut [QueryItem], ordering: Ordering) {
    // Stable sort in either direction: equal keys keep emission order.
    items.sort_by(|a, b| {
        let order = compare_items(a, b, ordering.by);
        match ordering.direction {
            OrderDirection::Ascending => order,
            OrderDirection::Descending => order.reverse(),
        }
    });
}

fn compare_items(a: &QueryItem, b: &QueryItem, order_by: OrderBy) -> CmpOrdering {
    match order_by {
        OrderBy::Label => a.label.cmp(&b.label),
        OrderBy::CommentRatio => a
            .counts
            .comment_ratio()
            .total_cmp(&b.counts.comment_ratio()),
        by => count_sort_key(&a.counts, by).cmp(&count_sort_key(&b.counts, by)),
    }
}

fn count_sort_key(counts: &LineCounts, order_by: OrderBy) -> u64 {
    match order_by {
        OrderBy::Code => counts.code,
        OrderBy::Comments => counts.comment,
        OrderBy::Blanks => counts.blank,
        OrderBy::Total => counts.total(),
        OrderBy::Label | OrderBy::CommentRatio => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::analyzer::{analyze, AnalyzeOptions};
    use crate::data::index::PathIndex;

    fn sample_treemap() -> Treemap {
        let index: PathIndex = [
            ("src/core/engine.py", LineCounts::new(300, 10, 40)),
            ("src/core/util.py", LineCounts::new(50, 25, 5)),
            ("src/cli.py", LineCounts::new(80, 0, 10)),
            ("setup.py", LineCounts::new(10, 5, 5)),
        ]
        .into_iter()
        .collect();
        analyze(&index, &AnalyzeOptions::new()).unwrap()
    }

    fn labels(qs: &NodeQuerySet) -> Vec<&str> {
        qs.items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_all_by_label() {
        let qs = NodeQuerySet::from_treemap(
            &sample_treemap(),
            Selection::All,
            Ordering::default(),
            None,
        );

        assert_eq!(
            labels(&qs),
            vec![
                "setup.py",
                "src",
                "src/cli.py",
                "src/core",
                "src/core/engine.py",
                "src/core/util.py"
            ]
        );
        assert_eq!(qs.file_count, 4);
        assert_eq!(qs.directory_count, 2);
        assert_eq!(qs.total, LineCounts::new(440, 40, 60));
    }

    #[test]
    fn test_files_by_code_descending() {
        let qs = NodeQuerySet::from_treemap(
            &sample_treemap(),
            Selection::Files,
            Ordering::by_code(),
            None,
        );

        assert_eq!(
            labels(&qs),
            vec!["src/core/engine.py", "src/cli.py", "src/core/util.py", "setup.py"]
        );
    }

    #[test]
    fn test_directories_only() {
        let qs = NodeQuerySet::from_treemap(
            &sample_treemap(),
            Selection::Directories,
            Ordering::by_label(),
            None,
        );

        assert_eq!(labels(&qs), vec!["src", "src/core"]);
        assert_eq!(qs.items[1].counts, LineCounts::new(350, 35, 45));
    }

    #[test]
    fn test_least_commented_first_with_limit() {
        let qs = NodeQuerySet::from_treemap(
            &sample_treemap(),
            Selection::Files,
            Ordering::by(OrderBy::CommentRatio),
            Some(2),
        );

        assert_eq!(labels(&qs), vec!["src/cli.py", "src/core/engine.py"]);
    }

    #[test]
    fn test_descending_ties_keep_emission_order() {
        let index: PathIndex = [
            ("a.py", LineCounts::new(5, 0, 0)),
            ("b.py", LineCounts::new(5, 0, 0)),
            ("c.py", LineCounts::new(9, 0, 0)),
            ("d.py", LineCounts::new(5, 0, 0)),
        ]
        .into_iter()
        .collect();
        let treemap = analyze(&index, &AnalyzeOptions::new()).unwrap();
        let qs = NodeQuerySet::from_treemap(&treemap, Selection::Files, Ordering::by_code(), None);

        assert_eq!(labels(&qs), vec!["c.py", "a.py", "b.py", "d.py"]);
    }

    #[test]
    fn test_root_is_never_listed() {
        let qs = NodeQuerySet::from_treemap(
            &sample_treemap(),
            Selection::All,
            Ordering::by(OrderBy::Total),
            None,
        );

        assert!(qs.items.iter().all(|i| i.kind != NodeKind::Root));
        assert_eq!(qs.items[0].label, "src");
    }
}
