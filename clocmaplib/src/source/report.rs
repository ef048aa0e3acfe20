//! Parsing of per-file line-count reports into a [`PathIndex`].
//!
//! Two shapes of `cloc --by-file` output are understood:
//!
//! - the plain text table, where each data row is
//!   `path  blank  comment  code` separated by runs of two or more spaces
//! - the `--json` document, an object keyed by path
//!
//! Report framing (banner, separator rules, column header, `SUM:` row) is
//! skipped. Any other row that does not split into exactly a path and three
//! integers aborts the whole parse: there is no partial-result mode.

use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::index::PathIndex;
use crate::data::stats::LineCounts;
use crate::error::ClocmapError;
use crate::Result;

static COLUMN_SPLITTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("column splitter pattern is valid"));

/// Progress lines cloc prints to stdout unless run with `--quiet`.
static PROGRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+ (text|unique) files?\.?|\d+ files? ignored\.?|classified \d+ files?.*|Counting: +\d+)$")
        .expect("progress line pattern is valid")
});

/// Format of a report document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Sniff the document: JSON if it starts with `{`, text otherwise
    #[default]
    Auto,
    /// `cloc --by-file` text table
    Text,
    /// `cloc --by-file --json` document
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ReportFormat::Auto),
            "text" | "txt" | "table" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

impl ReportFormat {
    /// Resolve `Auto` against the document contents.
    pub fn detect(self, input: &str) -> ReportFormat {
        match self {
            ReportFormat::Auto if input.trim_start().starts_with('{') => ReportFormat::Json,
            ReportFormat::Auto => ReportFormat::Text,
            other => other,
        }
    }
}

/// Parse a report held in memory.
pub fn parse_report(input: &str, format: ReportFormat) -> Result<PathIndex> {
    match format.detect(input) {
        ReportFormat::Json => parse_json_report(input),
        _ => parse_text_report(input),
    }
}

/// Read and parse a report file.
pub fn read_report(path: impl AsRef<Path>, format: ReportFormat) -> Result<PathIndex> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| ClocmapError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read report {} ({} bytes)", path.display(), input.len());
    parse_report(&input, format)
}

/// Parse a `cloc --by-file` text table.
pub fn parse_text_report(input: &str) -> Result<PathIndex> {
    let mut index = PathIndex::new();

    for (ix, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if is_framing(line) {
            continue;
        }
        let (path, counts) = parse_row(line).ok_or_else(|| ClocmapError::MalformedRow {
            line: ix + 1,
            content: raw.to_string(),
        })?;
        if index.insert(path, counts).is_some() {
            debug!("Duplicate report row for {}, keeping the later counts", path);
        }
    }

    debug!("Parsed {} file rows from text report", index.len());
    Ok(index)
}

/// Lines that belong to the report frame rather than to a file.
fn is_framing(line: &str) -> bool {
    line.is_empty()
        || line.chars().all(|c| c == '-' || c == '=')
        || line.starts_with("github.com/AlDanial/cloc")
        || line.starts_with("SUM:")
        || PROGRESS_LINE.is_match(line)
        || (line.starts_with("File") && line.ends_with("code"))
}

/// Split `path  blank  comment  code` into the path and its counts.
fn parse_row(line: &str) -> Option<(&str, LineCounts)> {
    let fields: Vec<&str> = COLUMN_SPLITTER.split(line).collect();
    let [path, blank, comment, code] = fields.as_slice() else {
        return None;
    };
    let blank = blank.parse().ok()?;
    let comment = comment.parse().ok()?;
    let code = code.parse().ok()?;
    Some((*path, LineCounts::new(code, comment, blank)))
}

/// One file entry of a `cloc --json` document.
#[derive(Debug, Deserialize)]
struct JsonRow {
    blank: u64,
    comment: u64,
    code: u64,
}

/// Parse a `cloc --by-file --json` document.
pub fn parse_json_report(input: &str) -> Result<PathIndex> {
    let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input)?;
    let mut index = PathIndex::new();

    for (path, value) in document {
        if path == "header" || path == "SUM" {
            continue;
        }
        if !value.is_object() {
            warn!("Skipping non-object JSON report entry '{}'", path);
            continue;
        }
        let row: JsonRow = serde_json::from_value(value)?;
        index.insert(path, LineCounts::new(row.code, row.comment, row.blank));
    }

    debug!("Parsed {} file rows from JSON report", index.len());
    Ok(index)
}
