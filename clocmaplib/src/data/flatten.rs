//! Bottom-up aggregation of a [`Hierarchy`] into flat treemap records.
//!
//! A single depth-first pass visits every node. A directory's record is
//! appended only after all of its descendants, and the synthetic root
//! record comes last of all.
//!
//! Display names repeat across a tree (`mod.rs`, `__init__.py`), so each
//! node gets an id of the form `{label}__{n}`, where `n` counts earlier
//! occurrences of the same label anywhere in the traversal. The counter is
//! global to the traversal rather than per directory: `x/util.py` and
//! `y/util.py` become `util.py__0` and `util.py__1`.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ClocmapError;
use crate::Result;

use super::hierarchy::{Hierarchy, HierarchyNode};
use super::index::PathIndex;
use super::stats::LineCounts;

/// Default id and display name of the synthetic root record.
pub const DEFAULT_ROOT_LABEL: &str = "root";

/// What a record stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A file with reported counts
    File,
    /// A directory summing its children
    Directory,
    /// The synthetic root summing everything
    Root,
}

/// One emitted row of the treemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Unique id (`label__n`, or the root label for the root)
    pub id: String,
    /// Display name: the raw path segment
    pub name: String,
    /// Id of the parent record; empty for the root
    pub parent: String,
    /// File, directory or root
    pub kind: NodeKind,
    /// Path relative to the base; empty for the root
    pub path: String,
    /// Own counts for a file, subtree sum otherwise
    pub counts: LineCounts,
}

/// Hands out collision-free ids for one traversal.
///
/// Each traversal owns its allocator, so two runs over the same hierarchy
/// produce the same ids.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    seen: HashMap<String, usize>,
}

impl IdAllocator {
    /// Create an allocator with no labels seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for the next occurrence of `label`, counting from 0.
    pub fn next_id(&mut self, label: &str) -> String {
        let n = match self.seen.get_mut(label) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.seen.insert(label.to_string(), 0);
                0
            }
        };
        format!("{}__{}", label, n)
    }
}

/// Flat treemap records and the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treemap {
    /// Records in emission order; the root is last
    pub records: Vec<FlatRecord>,
    /// Totals of the root
    pub total: LineCounts,
}

impl Treemap {
    /// The root record.
    pub fn root(&self) -> Option<&FlatRecord> {
        self.records.last()
    }

    /// Record by id.
    pub fn get(&self, id: &str) -> Option<&FlatRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Direct children of a record, in emission order.
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FlatRecord> + 'a {
        self.records.iter().filter(move |r| r.parent == id)
    }

    /// Number of emitted records, root included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Never true for a flattened hierarchy: the root is always emitted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of file records.
    pub fn file_count(&self) -> usize {
        self.count_kind(NodeKind::File)
    }

    /// Number of directory records.
    pub fn directory_count(&self) -> usize {
        self.count_kind(NodeKind::Directory)
    }

    fn count_kind(&self, kind: NodeKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

/// Aggregate `hierarchy` and emit one record per node plus the root.
///
/// Leaf counts come from `index`, looked up by the reconstructed report
/// path. A leaf without an entry means the hierarchy was not built from
/// this index and fails with [`ClocmapError::MissingEntry`]. Sums that do
/// not fit in a `u64` fail with [`ClocmapError::CountOverflow`].
pub fn flatten(hierarchy: &Hierarchy, index: &PathIndex, root_label: &str) -> Result<Treemap> {
    check_root_label(root_label)?;
    let mut flattener = Flattener {
        hierarchy,
        index,
        ids: IdAllocator::new(),
        records: Vec::new(),
    };

    let total = flattener.visit(hierarchy.children(), "", root_label)?;
    let mut records = flattener.records;
    records.push(FlatRecord {
        id: root_label.to_string(),
        name: root_label.to_string(),
        parent: String::new(),
        kind: NodeKind::Root,
        path: String::new(),
        counts: total,
    });

    debug!("Flattened hierarchy into {} records", records.len());
    Ok(Treemap { records, total })
}

/// The root id must differ from its own (empty) parent id and from every
/// generated `label__n` id.
fn check_root_label(root_label: &str) -> Result<()> {
    let looks_generated = root_label
        .rsplit_once("__")
        .is_some_and(|(_, n)| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
    if root_label.is_empty() || looks_generated {
        return Err(ClocmapError::InvalidRootLabel(root_label.to_string()));
    }
    Ok(())
}

struct Flattener<'a> {
    hierarchy: &'a Hierarchy,
    index: &'a PathIndex,
    ids: IdAllocator,
    records: Vec<FlatRecord>,
}

impl<'a> Flattener<'a> {
    fn visit(
        &mut self,
        children: &'a [(String, HierarchyNode)],
        dir: &str,
        parent_id: &str,
    ) -> Result<LineCounts> {
        let mut total = LineCounts::zero();

        for (label, node) in children {
            let id = self.ids.next_id(label);
            let path = if dir.is_empty() {
                label.clone()
            } else {
                format!("{}/{}", dir, label)
            };

            let (kind, counts) = match node {
                HierarchyNode::Interior(grandchildren) => {
                    (NodeKind::Directory, self.visit(grandchildren, &path, &id)?)
                }
                HierarchyNode::Leaf => {
                    let key = self.hierarchy.index_key(&path);
                    let counts = self
                        .index
                        .get(&key)
                        .ok_or(ClocmapError::MissingEntry(key))?;
                    (NodeKind::File, counts)
                }
            };

            self.records.push(FlatRecord {
                id,
                name: label.clone(),
                parent: parent_id.to_string(),
                kind,
                path,
                counts,
            });
            total = total.checked_add(counts).ok_or_else(|| {
                let scope = if dir.is_empty() { parent_id } else { dir };
                ClocmapError::CountOverflow(scope.to_string())
            })?;
        }

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::filter::FilterConfig;
    use std::collections::HashSet;

    fn sample_index() -> PathIndex {
        [
            ("a/b.py", LineCounts::new(10, 2, 1)),
            ("a/c.py", LineCounts::new(5, 0, 0)),
            ("d.py", LineCounts::new(3, 1, 0)),
        ]
        .into_iter()
        .collect()
    }

    fn run(index: &PathIndex, base: &str, filter: &FilterConfig) -> Treemap {
        let hierarchy = Hierarchy::build(index, base, filter).unwrap();
        flatten(&hierarchy, index, DEFAULT_ROOT_LABEL).unwrap()
    }

    fn by_name<'a>(treemap: &'a Treemap, name: &str) -> Vec<&'a FlatRecord> {
        treemap.records.iter().filter(|r| r.name == name).collect()
    }

    #[test]
    fn test_id_allocator_counts_globally_per_label() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id("util.py"), "util.py__0");
        assert_eq!(ids.next_id("src"), "src__0");
        assert_eq!(ids.next_id("util.py"), "util.py__1");
        assert_eq!(ids.next_id("util.py"), "util.py__2");
    }

    #[test]
    fn test_example_tree() {
        let index = sample_index();
        let treemap = run(&index, "", &FilterConfig::new());

        let expected = vec![
            ("b.py__0", "b.py", "a__0", LineCounts::new(10, 2, 1)),
            ("c.py__0", "c.py", "a__0", LineCounts::new(5, 0, 0)),
            ("a__0", "a", "root", LineCounts::new(15, 2, 1)),
            ("d.py__0", "d.py", "root", LineCounts::new(3, 1, 0)),
            ("root", "root", "", LineCounts::new(18, 3, 1)),
        ];
        let actual: Vec<(&str, &str, &str, LineCounts)> = treemap
            .records
            .iter()
            .map(|r| (r.id.as_str(), r.name.as_str(), r.parent.as_str(), r.counts))
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(treemap.total, LineCounts::new(18, 3, 1));
        assert_eq!(treemap.file_count(), 3);
        assert_eq!(treemap.directory_count(), 1);
    }

    #[test]
    fn test_collision_ids_are_global_not_per_parent() {
        let index: PathIndex = [
            ("x/util.py", LineCounts::new(4, 0, 0)),
            ("y/util.py", LineCounts::new(6, 0, 0)),
        ]
        .into_iter()
        .collect();
        let treemap = run(&index, "", &FilterConfig::new());

        let utils = by_name(&treemap, "util.py");
        assert_eq!(utils.len(), 2);
        assert_eq!(utils[0].id, "util.py__0");
        assert_eq!(utils[0].parent, "x__0");
        assert_eq!(utils[1].id, "util.py__1");
        assert_eq!(utils[1].parent, "y__0");
        assert_eq!(treemap.total, LineCounts::new(10, 0, 0));
    }

    #[test]
    fn test_directory_and_file_sharing_a_label() {
        let index: PathIndex = [
            ("utils/utils", LineCounts::new(1, 0, 0)),
            ("lib/utils", LineCounts::new(2, 0, 0)),
        ]
        .into_iter()
        .collect();
        let treemap = run(&index, "", &FilterConfig::new());

        let ids: Vec<&str> = by_name(&treemap, "utils")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        // Children are emitted before their parent, but ids are taken on entry.
        assert_eq!(ids, vec!["utils__1", "utils__0", "utils__2"]);
    }

    #[test]
    fn test_root_is_last_and_sums_everything() {
        let index = sample_index();
        let treemap = run(&index, "", &FilterConfig::new());

        let root = treemap.root().unwrap();
        assert_eq!(root.kind, NodeKind::Root);
        assert_eq!(root.parent, "");
        assert_eq!(root.counts, index.total());
    }

    #[test]
    fn test_sum_invariant_holds_for_every_directory() {
        let index: PathIndex = [
            ("src/a/x.rs", LineCounts::new(3, 1, 1)),
            ("src/a/y.rs", LineCounts::new(4, 0, 2)),
            ("src/b/z.rs", LineCounts::new(7, 2, 0)),
            ("src/main.rs", LineCounts::new(1, 1, 1)),
            ("README", LineCounts::new(0, 0, 9)),
        ]
        .into_iter()
        .collect();
        let treemap = run(&index, "", &FilterConfig::new());

        for record in treemap.records.iter().filter(|r| r.kind != NodeKind::File) {
            let sum: LineCounts = treemap.children_of(&record.id).map(|c| &c.counts).sum();
            assert_eq!(record.counts, sum, "sum mismatch for {}", record.id);
        }
    }

    #[test]
    fn test_ids_unique_and_parents_linked() {
        let index: PathIndex = [
            ("a/__init__.py", LineCounts::new(1, 0, 0)),
            ("a/b/__init__.py", LineCounts::new(1, 0, 0)),
            ("b/__init__.py", LineCounts::new(1, 0, 0)),
            ("b/a/__init__.py", LineCounts::new(1, 0, 0)),
        ]
        .into_iter()
        .collect();
        let treemap = run(&index, "", &FilterConfig::new());

        let ids: HashSet<&str> = treemap.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), treemap.len());
        for record in &treemap.records {
            if record.kind == NodeKind::Root {
                continue;
            }
            let parents = treemap
                .records
                .iter()
                .filter(|r| r.id == record.parent)
                .count();
            assert_eq!(parents, 1, "parent of {} not emitted once", record.id);
        }
    }

    #[test]
    fn test_filter_drops_leaves_and_emptied_directories() {
        let index: PathIndex = [
            ("a/b.py", LineCounts::new(10, 2, 1)),
            ("a/c.java", LineCounts::new(50, 0, 0)),
            ("java/Main.java", LineCounts::new(40, 0, 0)),
            ("d.py", LineCounts::new(3, 1, 0)),
        ]
        .into_iter()
        .collect();
        let treemap = run(&index, "", &FilterConfig::new().extension(".py"));

        for record in treemap.records.iter().filter(|r| r.kind == NodeKind::File) {
            assert!(record.path.contains(".py"));
        }
        assert!(by_name(&treemap, "java").is_empty());
        assert_eq!(treemap.total, LineCounts::new(13, 3, 1));
    }

    #[test]
    fn test_base_path_reconstructs_index_keys() {
        let index: PathIndex = [
            ("../proj/pkg/mod.py", LineCounts::new(8, 1, 2)),
            ("../proj/run.py", LineCounts::new(2, 0, 0)),
        ]
        .into_iter()
        .collect();
        let treemap = run(&index, "../proj", &FilterConfig::new());

        let modules = by_name(&treemap, "mod.py");
        let module = modules[0];
        assert_eq!(module.path, "pkg/mod.py");
        assert_eq!(module.counts, LineCounts::new(8, 1, 2));
        assert_eq!(treemap.total, LineCounts::new(10, 1, 2));
    }

    #[test]
    fn test_missing_entry_is_fatal() {
        let built_from: PathIndex = [("a/b.py", LineCounts::new(1, 0, 0))]
            .into_iter()
            .collect();
        let hierarchy = Hierarchy::build(&built_from, "", &FilterConfig::new()).unwrap();

        let err = flatten(&hierarchy, &PathIndex::new(), DEFAULT_ROOT_LABEL).unwrap_err();
        assert!(matches!(err, ClocmapError::MissingEntry(ref key) if key == "a/b.py"));
    }

    #[test]
    fn test_empty_hierarchy_emits_only_root() {
        let index = PathIndex::new();
        let treemap = run(&index, "", &FilterConfig::new());

        assert_eq!(treemap.len(), 1);
        assert_eq!(treemap.root().unwrap().counts, LineCounts::zero());
    }

    #[test]
    fn test_custom_root_label() {
        let index = sample_index();
        let hierarchy = Hierarchy::build(&index, "", &FilterConfig::new()).unwrap();
        let treemap = flatten(&hierarchy, &index, "project").unwrap();

        assert_eq!(treemap.root().unwrap().id, "project");
        assert_eq!(treemap.get("a__0").unwrap().parent, "project");
    }

    #[test]
    fn test_root_label_must_not_clash_with_node_ids() {
        let index = sample_index();
        let hierarchy = Hierarchy::build(&index, "", &FilterConfig::new()).unwrap();

        for bad in ["", "a__0", "src__12"] {
            let result = flatten(&hierarchy, &index, bad);
            assert!(
                matches!(result, Err(ClocmapError::InvalidRootLabel(ref label)) if label == bad),
                "{bad:?} should be rejected"
            );
        }
        for good in ["my__project", "v__", "root"] {
            assert!(flatten(&hierarchy, &index, good).is_ok(), "{good:?} is valid");
        }
    }

    #[test]
    fn test_overflowing_sum_is_an_error() {
        let index: PathIndex = [
            ("pkg/a.py", LineCounts::new(u64::MAX, 0, 0)),
            ("pkg/b.py", LineCounts::new(1, 0, 0)),
        ]
        .into_iter()
        .collect();
        let hierarchy = Hierarchy::build(&index, "", &FilterConfig::new()).unwrap();
        let result = flatten(&hierarchy, &index, DEFAULT_ROOT_LABEL);

        assert!(matches!(result, Err(ClocmapError::CountOverflow(ref scope)) if scope == "pkg"));
    }

    #[test]
    fn test_overflow_at_top_level_names_the_root() {
        let index: PathIndex = [
            ("a.py", LineCounts::new(0, u64::MAX, 0)),
            ("b.py", LineCounts::new(0, 1, 0)),
        ]
        .into_iter()
        .collect();
        let hierarchy = Hierarchy::build(&index, "", &FilterConfig::new()).unwrap();
        let err = flatten(&hierarchy, &index, DEFAULT_ROOT_LABEL).unwrap_err();

        assert_eq!(err.to_string(), "line counts under 'root' overflow");
    }

    #[test]
    fn test_runs_are_idempotent() {
        let index = sample_index();
        let hierarchy = Hierarchy::build(&index, "", &FilterConfig::new()).unwrap();

        let first = flatten(&hierarchy, &index, DEFAULT_ROOT_LABEL).unwrap();
        let second = flatten(&hierarchy, &index, DEFAULT_ROOT_LABEL).unwrap();
        assert_eq!(first, second);
    }
}
