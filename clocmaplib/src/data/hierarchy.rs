//! Directory hierarchy built from slash-separated report paths.
//!
//! Every kept report path is stripped of the base path, split into segments
//! and threaded into a tree whose interior nodes are directories and whose
//! leaves are files. Children keep the order in which they were first seen,
//! which is the order of the report.

use log::{debug, warn};

use crate::error::ClocmapError;
use crate::source::filter::FilterConfig;
use crate::Result;

use super::index::PathIndex;

/// Ordered children of an interior node, keyed by path segment.
pub type Children = Vec<(String, HierarchyNode)>;

/// A node in the directory hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyNode {
    /// A file; its counts live in the [`PathIndex`]
    Leaf,
    /// A directory with at least one child
    Interior(Children),
}

impl HierarchyNode {
    /// Whether this node is a file.
    pub fn is_leaf(&self) -> bool {
        matches!(self, HierarchyNode::Leaf)
    }

    /// Children of a directory; empty for a file.
    pub fn children(&self) -> &[(String, HierarchyNode)] {
        match self {
            HierarchyNode::Leaf => &[],
            HierarchyNode::Interior(children) => children,
        }
    }

    /// Look up a direct child by label.
    pub fn child(&self, label: &str) -> Option<&HierarchyNode> {
        find_child(self.children(), label)
    }
}

fn find_child<'a>(children: &'a [(String, HierarchyNode)], label: &str) -> Option<&'a HierarchyNode> {
    children
        .iter()
        .find(|(name, _)| name == label)
        .map(|(_, node)| node)
}

/// The full hierarchy below an (unlabeled) root directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    /// Prefix removed from report paths: empty, or the base path plus `/`
    prefix: String,
    /// Top-level entries
    children: Children,
}

impl Hierarchy {
    /// Build the hierarchy for every report path that survives `filter`.
    ///
    /// Paths are processed in index order. A path that contains the
    /// extension substring and does not match an exclude pattern becomes a
    /// leaf; the directories on its way are created as needed.
    pub fn build(index: &PathIndex, base_path: &str, filter: &FilterConfig) -> Result<Self> {
        let mut hierarchy = Hierarchy {
            prefix: base_prefix(base_path),
            children: Vec::new(),
        };
        let mut kept = 0usize;

        for (path, _) in index.iter() {
            if !filter.keeps_extension(path) {
                continue;
            }
            let relative = hierarchy.relative_path(path)?;
            if filter.is_excluded(relative) {
                continue;
            }
            let segments = split_segments(path, relative)?;
            insert_segments(&mut hierarchy.children, &segments, path);
            kept += 1;
        }

        debug!(
            "Built hierarchy from {} of {} report paths ({} top-level entries)",
            kept,
            index.len(),
            hierarchy.children.len()
        );
        Ok(hierarchy)
    }

    /// Top-level entries, in report order.
    pub fn children(&self) -> &[(String, HierarchyNode)] {
        &self.children
    }

    /// Whether no path survived filtering.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Follow a base-relative path (`a/b.py`) down the tree.
    pub fn get(&self, relative: &str) -> Option<&HierarchyNode> {
        let mut segments = relative.split('/');
        let first = segments.next()?;
        let mut node = find_child(&self.children, first)?;
        for segment in segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Reconstruct the report path of a base-relative path.
    pub fn index_key(&self, relative: &str) -> String {
        format!("{}{}", self.prefix, relative)
    }

    /// Number of files in the tree.
    pub fn file_count(&self) -> usize {
        count_nodes(&self.children, true)
    }

    /// Number of directories in the tree (the root excluded).
    pub fn directory_count(&self) -> usize {
        count_nodes(&self.children, false)
    }

    /// Strip the base prefix from a report path.
    fn relative_path<'a>(&self, path: &'a str) -> Result<&'a str> {
        path.strip_prefix(self.prefix.as_str())
            .ok_or_else(|| ClocmapError::PathOutsideBase {
                path: path.to_string(),
                base: self.prefix.trim_end_matches('/').to_string(),
            })
    }
}

/// An empty base means report paths are already relative.
fn base_prefix(base_path: &str) -> String {
    if base_path.is_empty() {
        String::new()
    } else {
        format!("{}/", base_path.trim_end_matches('/'))
    }
}

fn split_segments<'a>(path: &str, relative: &'a str) -> Result<Vec<&'a str>> {
    let segments: Vec<&str> = relative.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ClocmapError::EmptyPathSegment(path.to_string()));
    }
    Ok(segments)
}

fn insert_segments(children: &mut Children, segments: &[&str], path: &str) {
    let Some((label, rest)) = segments.split_first() else {
        return;
    };

    let pos = match children.iter().position(|(name, _)| name == label) {
        Some(pos) => pos,
        None => {
            let node = if rest.is_empty() {
                HierarchyNode::Leaf
            } else {
                HierarchyNode::Interior(Vec::new())
            };
            children.push((label.to_string(), node));
            children.len() - 1
        }
    };
    let node = &mut children[pos].1;

    if rest.is_empty() {
        // A repeated path lands on its own leaf and is absorbed.
        if !node.is_leaf() {
            warn!("'{}' names an existing directory, ignoring the file entry", path);
        }
        return;
    }

    if node.is_leaf() {
        warn!(
            "'{}' is both a file and a directory in the report; treating it as a directory",
            label
        );
        *node = HierarchyNode::Interior(Vec::new());
    }
    if let HierarchyNode::Interior(grandchildren) = node {
        insert_segments(grandchildren, rest, path);
    }
}

fn count_nodes(children: &[(String, HierarchyNode)], leaves: bool) -> usize {
    children
        .iter()
        .map(|(_, node)| {
            let own = usize::from(node.is_leaf() == leaves);
            own + count_nodes(node.children(), leaves)
        })
        .sum()
}
