//! Template rendering for CLI output using outstanding

use clocmaplib::{LineCounts, NodeKind, NodeQuerySet, NodeTable};
use console::Style;
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

/// Table template; rows arrive pre-padded.
const NODE_TABLE_TEMPLATE: &str = concat!(
    "{% if title %}{{ title | style(\"title\") }}\n\n{% endif %}",
    "{{ header | style(\"category\") }}\n",
    "{{ separator }}\n",
    "{% for row in rows %}{{ row }}\n{% endfor %}",
    "{{ separator }}\n",
    "{{ footer | style(\"category\") }}\n",
);

/// Width of each numeric column
const CELL_WIDTH: usize = 10;
/// Bounds for the label column
const MIN_NAME_WIDTH: usize = 20;
const MAX_NAME_WIDTH: usize = 60;

/// Data context for the table template
#[derive(Debug, Serialize)]
struct NodeTableContext {
    title: Option<String>,
    /// Pre-padded header line
    header: String,
    /// Separator line (dashes)
    separator: String,
    /// Pre-padded data rows
    rows: Vec<String>,
    /// Pre-padded footer line
    footer: String,
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new()
        .add("category", Style::new().bold())
        .add("title", Style::new().bold().underlined())
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() > max_len {
        let tail: String = chars[chars.len() - (max_len - 2)..].iter().collect();
        format!("..{}", tail)
    } else {
        name.to_string()
    }
}

/// Label column width: fits the longest label within the bounds.
fn name_width(table: &NodeTable) -> usize {
    let longest = table
        .rows
        .iter()
        .chain(std::iter::once(&table.footer))
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);
    (longest + 2).clamp(MIN_NAME_WIDTH, MAX_NAME_WIDTH)
}

fn format_row(label: &str, values: &[String], name_width: usize) -> String {
    let mut line = format!(
        "{:<width$}",
        truncate_name(label, name_width - 2),
        width = name_width
    );
    for value in values {
        line.push_str(&format!(" {:>width$}", value, width = CELL_WIDTH));
    }
    line
}

fn build_context(table: &NodeTable) -> NodeTableContext {
    let width = name_width(table);
    let (label_header, value_headers) = table
        .headers
        .split_first()
        .map(|(first, rest)| (first.as_str(), rest))
        .unwrap_or(("", &[]));

    NodeTableContext {
        title: table.title.clone(),
        header: format_row(label_header, value_headers, width),
        separator: "-".repeat(width + (CELL_WIDTH + 1) * value_headers.len()),
        rows: table
            .rows
            .iter()
            .map(|row| format_row(&row.label, &row.values, width))
            .collect(),
        footer: format_row(&table.footer.label, &table.footer.values, width),
    }
}

/// Render a table using outstanding's output-mode aware renderer
pub fn render_table(
    table: &NodeTable,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let theme = create_theme();
    let context = build_context(table);
    let mut rendered = render_with_output(NODE_TABLE_TEMPLATE, &context, &theme, output_mode)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Serialize any output shape through outstanding's JSON mode
pub fn render_json<T: Serialize>(value: &T) -> Result<String, Box<dyn std::error::Error>> {
    let theme = create_theme();
    let mut rendered = render_auto(NODE_TABLE_TEMPLATE, value, &theme, OutputMode::Json)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Render a query set as CSV
pub fn render_csv(qs: &NodeQuerySet) -> String {
    let mut output = String::from("path,kind,code,comment,blank,total,comment_ratio\n");

    let format_row = |path: &str, kind: &str, counts: &LineCounts| -> String {
        format!(
            "\"{}\",{},{},{},{},{},{:.4}\n",
            path.replace('"', "\"\""),
            kind,
            counts.code,
            counts.comment,
            counts.blank,
            counts.total(),
            counts.comment_ratio()
        )
    };

    for item in &qs.items {
        let kind = match item.kind {
            NodeKind::File => "file",
            NodeKind::Directory => "directory",
            NodeKind::Root => "root",
        };
        output.push_str(&format_row(&item.label, kind, &item.counts));
    }
    output.push_str(&format_row("", "root", &qs.total));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use clocmaplib::{analyze, AnalyzeOptions, Ordering, PathIndex, Selection};

    fn sample_queryset() -> NodeQuerySet {
        let index: PathIndex = [
            ("src/lib.rs", LineCounts::new(40, 10, 5)),
            ("src/main.rs", LineCounts::new(20, 0, 5)),
        ]
        .into_iter()
        .collect();
        let treemap = analyze(&index, &AnalyzeOptions::new()).unwrap();
        NodeQuerySet::from_treemap(&treemap, Selection::All, Ordering::default(), None)
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("a/very/long/path.rs", 10), "../path.rs");
        assert_eq!(truncate_name("src/module_name.rs", 12), "..le_name.rs");
    }

    #[test]
    fn test_build_context_pads_rows() {
        let table = NodeTable::from_queryset(&sample_queryset());
        let context = build_context(&table);

        assert_eq!(context.rows.len(), 3);
        assert!(context.header.starts_with("Path"));
        assert_eq!(context.separator.len(), context.header.len());
        assert!(context.rows.iter().all(|r| r.len() == context.header.len()));
    }

    #[test]
    fn test_render_table_plain_text() {
        let table = NodeTable::from_queryset(&sample_queryset()).with_title("demo");
        let output = render_table(&table, OutputMode::Text).unwrap();

        assert!(output.starts_with("demo\n\n"));
        assert!(output.contains("Comment %"));
        assert!(output.contains("src/lib.rs"));
        assert!(output.contains("Total (2 files, 1 dirs)"));
        assert!(output.contains("12.5%"));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_render_json() {
        let output = render_json(&sample_queryset()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["items"][0]["label"], "src");
        assert_eq!(value["total"]["code"], 60);
    }

    #[test]
    fn test_render_csv() {
        let output = render_csv(&sample_queryset());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "path,kind,code,comment,blank,total,comment_ratio");
        assert_eq!(lines[1], "\"src\",directory,60,10,10,80,0.1250");
        assert_eq!(lines[2], "\"src/lib.rs\",file,40,10,5,55,0.1818");
        assert_eq!(lines.last().copied(), Some("\"\",root,60,10,10,80,0.1250"));
    }
}
