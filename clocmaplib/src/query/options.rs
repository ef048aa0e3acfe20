//! Options controlling which records a listing shows and in what order.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which records a listing includes. The root is never listed; its totals
/// are the listing's footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    /// Files and directories
    #[default]
    All,
    /// Only files
    Files,
    /// Only directories
    Directories,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Selection::All),
            "files" | "file" => Ok(Selection::Files),
            "dirs" | "dir" | "directories" | "directory" => Ok(Selection::Directories),
            _ => Err(format!("Unknown selection: {}", s)),
        }
    }
}

/// Field to order results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderBy {
    /// Order by relative path (lexicographical)
    #[default]
    Label,
    /// Order by code line count
    Code,
    /// Order by comment line count
    Comments,
    /// Order by blank line count
    Blanks,
    /// Order by total line count
    Total,
    /// Order by share of comment lines
    CommentRatio,
}

impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "label" | "name" | "path" => Ok(OrderBy::Label),
            "code" => Ok(OrderBy::Code),
            "comments" | "comment" => Ok(OrderBy::Comments),
            "blanks" | "blank" => Ok(OrderBy::Blanks),
            "total" => Ok(OrderBy::Total),
            "ratio" | "comment-ratio" | "comment_ratio" => Ok(OrderBy::CommentRatio),
            _ => Err(format!("Unknown order field: {}", s)),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending (A-Z, smallest first)
    #[default]
    Ascending,
    /// Descending (Z-A, largest first)
    Descending,
}

/// Ordering configuration for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    /// Field to order by
    pub by: OrderBy,
    /// Sort direction
    pub direction: OrderDirection,
}

impl Default for Ordering {
    fn default() -> Self {
        Self {
            by: OrderBy::Label,
            direction: OrderDirection::Ascending,
        }
    }
}

impl Ordering {
    /// Create ordering by label ascending (default)
    pub fn by_label() -> Self {
        Self::default()
    }

    /// Create ordering for a field, with the field's natural direction.
    ///
    /// Labels read best A-Z; counts read best largest first. Comment ratio
    /// sorts ascending so the least commented code comes first.
    pub fn by(field: OrderBy) -> Self {
        let direction = match field {
            OrderBy::Label | OrderBy::CommentRatio => OrderDirection::Ascending,
            _ => OrderDirection::Descending,
        };
        Self {
            by: field,
            direction,
        }
    }

    /// Create ordering by code count
    pub fn by_code() -> Self {
        Self::by(OrderBy::Code)
    }

    /// Set sort direction to ascending
    pub fn ascending(mut self) -> Self {
        self.direction = OrderDirection::Ascending;
        self
    }

    /// Set sort direction to descending
    pub fn descending(mut self) -> Self {
        self.direction = OrderDirection::Descending;
        self
    }
}
