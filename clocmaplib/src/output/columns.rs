//! Parallel-array form of a treemap.
//!
//! Generic treemap renderers take one sequence per attribute rather than a
//! list of records. This is the only place records are split into columns,
//! so every column is built from the same pass and has the same length.

use serde::{Deserialize, Serialize};

use crate::data::flatten::Treemap;
use crate::data::stats::LineCounts;

/// Equal-length columns, one entry per record, root last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreemapColumns {
    pub ids: Vec<String>,
    pub names: Vec<String>,
    pub parents: Vec<String>,
    pub code: Vec<u64>,
    pub comment: Vec<u64>,
    pub blank: Vec<u64>,
    /// Root totals
    pub total: LineCounts,
}

impl TreemapColumns {
    /// Split treemap records into columns.
    pub fn from_treemap(treemap: &Treemap) -> Self {
        let mut columns = TreemapColumns {
            total: treemap.total,
            ..Default::default()
        };
        for record in &treemap.records {
            columns.ids.push(record.id.clone());
            columns.names.push(record.name.clone());
            columns.parents.push(record.parent.clone());
            columns.code.push(record.counts.code);
            columns.comment.push(record.counts.comment);
            columns.blank.push(record.counts.blank);
        }
        columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<&Treemap> for TreemapColumns {
    fn from(treemap: &Treemap) -> Self {
        Self::from_treemap(treemap)
    }
}
