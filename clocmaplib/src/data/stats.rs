//! Core data structures for line-count statistics.
//!
//! Every file in a report carries three counts, in this fixed order:
//!
//! - **code**: lines of source code
//! - **comment**: comment lines
//! - **blank**: blank/whitespace-only lines
//!
//! Directories carry the element-wise sum of everything below them.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Line counts for a single file or an aggregated directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCounts {
    /// Lines of code
    pub code: u64,
    /// Comment lines
    pub comment: u64,
    /// Blank lines
    pub blank: u64,
}

impl LineCounts {
    /// Create counts in `(code, comment, blank)` order.
    pub fn new(code: u64, comment: u64, blank: u64) -> Self {
        Self {
            code,
            comment,
            blank,
        }
    }

    /// All three counts are zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Total lines (code + comment + blank).
    pub fn total(&self) -> u64 {
        self.code
            .saturating_add(self.comment)
            .saturating_add(self.blank)
    }

    /// Share of comment lines among all lines, in `[0.0, 1.0]`.
    ///
    /// An empty file (all counts zero) is a valid input and reports `0.0`.
    pub fn comment_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.comment as f64 / total as f64,
        }
    }

    /// Element-wise sum, or `None` if any count overflows.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            code: self.code.checked_add(other.code)?,
            comment: self.comment.checked_add(other.comment)?,
            blank: self.blank.checked_add(other.blank)?,
        })
    }

    /// The counts as a `(code, comment, blank)` tuple.
    pub fn as_tuple(&self) -> (u64, u64, u64) {
        (self.code, self.comment, self.blank)
    }
}

impl From<(u64, u64, u64)> for LineCounts {
    fn from((code, comment, blank): (u64, u64, u64)) -> Self {
        Self::new(code, comment, blank)
    }
}

/// Saturating; aggregation uses [`LineCounts::checked_add`] instead.
impl Add for LineCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            code: self.code.saturating_add(other.code),
            comment: self.comment.saturating_add(other.comment),
            blank: self.blank.saturating_add(other.blank),
        }
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for LineCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a LineCounts> for LineCounts {
    fn sum<I: Iterator<Item = &'a LineCounts>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
