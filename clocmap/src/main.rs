//! # clocmap
//!
//! A CLI tool that turns a per-file line-count report into a treemap-ready
//! directory aggregation.
//!
//! ## Overview
//!
//! clocmap is built on top of clocmaplib. It reads the report of an external
//! line counter (`cloc --by-file`, as a text table or `--json`), rebuilds the
//! directory tree from the file paths, and sums code, comment and blank
//! lines bottom-up.
//!
//! ## Features
//!
//! - **Report formats**: cloc text tables and cloc JSON, detected automatically
//! - **Filtering**: by extension with `--ext`, by glob with `--exclude`
//! - **Bundles**: several `--ext` values produce one treemap per extension
//! - **Multiple output formats**: table (default), JSON, columns, figure, CSV
//!
//! ## Usage
//!
//! ```bash
//! # Aggregate a cloc report, shown as a table
//! cloc --by-file --quiet . > report.txt
//! clocmap report.txt
//!
//! # Read from stdin, strip a leading directory, keep only Python files
//! cloc --by-file --json --quiet repo | clocmap --base repo --ext .py
//!
//! # Emit a plotly treemap description
//! clocmap report.txt --output figure --title my-repo
//!
//! # Largest files first, top 20
//! clocmap report.txt --kind files --order code --top 20
//!
//! # One treemap per extension, as parallel columns
//! clocmap report.txt --ext '*' --ext .py --ext .js --output columns
//! ```

mod render;

use std::collections::BTreeMap;
use std::io::Read;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use clocmaplib::{
    analyze, analyze_bundle, parse_report, read_report, AnalyzeOptions, FilterConfig, NodeQuerySet,
    NodeTable, OrderBy, Ordering, PathIndex, ReportFormat, Selection, Treemap, TreemapColumns,
    TreemapFigure, ALL_EXTENSIONS, DEFAULT_ROOT_LABEL,
};
use env_logger::Env;
use log::{debug, info};
use render::OutputMode;
use serde::Serialize;

/// Output shape selected with `--output`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
    Columns,
    Figure,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "columns" => Ok(OutputFormat::Columns),
            "figure" => Ok(OutputFormat::Figure),
            "csv" => Ok(OutputFormat::Csv),
            other => bail!("unknown output format: {}", other),
        }
    }
}

/// Listing options shared by the table and CSV outputs
#[derive(Debug, Clone, Copy)]
struct Listing {
    selection: Selection,
    ordering: Ordering,
    limit: Option<usize>,
}

impl Listing {
    fn query(&self, treemap: &Treemap) -> NodeQuerySet {
        NodeQuerySet::from_treemap(treemap, self.selection, self.ordering, self.limit)
    }
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("clocmap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Aggregate per-file line counts into a directory treemap")
        .arg(
            Arg::new("report")
                .help("Line-count report to read ('-' or absent reads stdin)")
                .default_value("-"),
        )
        .arg(
            Arg::new("base")
                .short('b')
                .long("base")
                .help("Leading path to strip from every report path"),
        )
        .arg(
            Arg::new("ext")
                .short('x')
                .long("ext")
                .action(ArgAction::Append)
                .help("Keep paths containing this extension; repeat for one treemap per value ('*' keeps all)"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude paths matching glob pattern (relative to the base)"),
        )
        .arg(
            Arg::new("root-label")
                .long("root-label")
                .default_value(DEFAULT_ROOT_LABEL)
                .help("Label of the root node"),
        )
        .arg(
            Arg::new("input-format")
                .long("input-format")
                .value_parser(["auto", "text", "json"])
                .default_value("auto")
                .help("Report format"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json", "columns", "figure", "csv"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("color")
                .long("color")
                .value_parser(["auto", "always", "never"])
                .default_value("auto")
                .help("Style table output (auto styles terminals only)"),
        )
        .arg(
            Arg::new("kind")
                .short('k')
                .long("kind")
                .value_parser(["all", "files", "dirs"])
                .default_value("all")
                .help("Records to list in table and CSV output"),
        )
        .arg(
            Arg::new("order")
                .long("order")
                .value_parser(["path", "code", "comments", "blanks", "total", "ratio"])
                .default_value("path")
                .help("Sort field for table and CSV output"),
        )
        .arg(
            Arg::new("asc")
                .long("asc")
                .action(ArgAction::SetTrue)
                .conflicts_with("desc")
                .help("Sort ascending"),
        )
        .arg(
            Arg::new("desc")
                .long("desc")
                .action(ArgAction::SetTrue)
                .help("Sort descending"),
        )
        .arg(
            Arg::new("top")
                .short('n')
                .long("top")
                .value_parser(clap::value_parser!(usize))
                .help("Show only the first N rows"),
        )
        .arg(
            Arg::new("title")
                .short('t')
                .long("title")
                .help("Title for the table or figure"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log pipeline details to stderr"),
        )
}

fn get_str<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .unwrap_or_default()
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> Result<FilterConfig, anyhow::Error> {
    let mut filter = FilterConfig::new();

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    Ok(filter)
}

/// Map `--color` onto outstanding's output modes
fn extract_output_mode(matches: &ArgMatches) -> OutputMode {
    match get_str(matches, "color") {
        "always" => OutputMode::Term,
        "never" => OutputMode::Text,
        _ => OutputMode::Auto,
    }
}

/// Extract extensions list from matches
fn extract_extensions(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("ext")
        .map(|v| v.cloned().collect())
        .unwrap_or_default()
}

fn build_listing(matches: &ArgMatches) -> Result<Listing, anyhow::Error> {
    let selection = Selection::from_str(get_str(matches, "kind")).map_err(anyhow::Error::msg)?;
    let order_by = OrderBy::from_str(get_str(matches, "order")).map_err(anyhow::Error::msg)?;

    let mut ordering = Ordering::by(order_by);
    if matches.get_flag("asc") {
        ordering = ordering.ascending();
    } else if matches.get_flag("desc") {
        ordering = ordering.descending();
    }

    Ok(Listing {
        selection,
        ordering,
        limit: matches.get_one::<usize>("top").copied(),
    })
}

/// Read the report named on the command line, or stdin
fn load_index(matches: &ArgMatches) -> Result<PathIndex, anyhow::Error> {
    let format =
        ReportFormat::from_str(get_str(matches, "input-format")).map_err(anyhow::Error::msg)?;
    let report = get_str(matches, "report");

    let index = if report == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read report from stdin")?;
        parse_report(&input, format)?
    } else {
        read_report(report, format)?
    };

    info!("Loaded {} report entries", index.len());
    Ok(index)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, anyhow::Error> {
    render::render_json(value).map_err(|e| anyhow!("failed to render JSON: {e}"))
}

/// Render one treemap in the requested shape
fn render_treemap(
    treemap: &Treemap,
    format: OutputFormat,
    listing: &Listing,
    title: Option<&str>,
    output_mode: OutputMode,
) -> Result<String, anyhow::Error> {
    match format {
        OutputFormat::Table => {
            let mut table = NodeTable::from_queryset(&listing.query(treemap));
            if let Some(title) = title {
                table = table.with_title(title);
            }
            render::render_table(&table, output_mode)
                .map_err(|e| anyhow!("failed to render table: {e}"))
        }
        OutputFormat::Csv => Ok(render::render_csv(&listing.query(treemap))),
        OutputFormat::Json => to_json(treemap),
        OutputFormat::Columns => to_json(&TreemapColumns::from(treemap)),
        OutputFormat::Figure => to_json(&TreemapFigure::from_treemap(
            treemap,
            title.map(str::to_string),
        )),
    }
}

/// Render a bundle: JSON shapes become one object keyed by extension,
/// text shapes become one section per extension.
fn render_bundle(
    bundle: &BTreeMap<String, Treemap>,
    format: OutputFormat,
    listing: &Listing,
    title: Option<&str>,
    output_mode: OutputMode,
) -> Result<String, anyhow::Error> {
    match format {
        OutputFormat::Json => to_json(bundle),
        OutputFormat::Columns => {
            let columns: BTreeMap<&str, TreemapColumns> = bundle
                .iter()
                .map(|(ext, treemap)| (ext.as_str(), TreemapColumns::from(treemap)))
                .collect();
            to_json(&columns)
        }
        OutputFormat::Figure => {
            let figures: BTreeMap<&str, TreemapFigure> = bundle
                .iter()
                .map(|(ext, treemap)| {
                    let figure_title = section_title(title, ext);
                    (
                        ext.as_str(),
                        TreemapFigure::from_treemap(treemap, Some(figure_title)),
                    )
                })
                .collect();
            to_json(&figures)
        }
        OutputFormat::Table | OutputFormat::Csv => {
            let mut sections = Vec::new();
            for (ext, treemap) in bundle {
                let heading = section_title(title, ext);
                let body = render_treemap(treemap, format, listing, Some(&heading), output_mode)?;
                sections.push(if format == OutputFormat::Csv {
                    format!("# {}\n{}", heading, body)
                } else {
                    body
                });
            }
            Ok(sections.join("\n"))
        }
    }
}

fn section_title(title: Option<&str>, ext: &str) -> String {
    match title {
        Some(title) => format!("{} ({})", title, ext),
        None => ext.to_string(),
    }
}

/// Handler for the root command
fn run(matches: &ArgMatches) -> Result<String, anyhow::Error> {
    let format = OutputFormat::from_str(get_str(matches, "output"))?;
    let listing = build_listing(matches)?;
    let title = matches.get_one::<String>("title").map(|s| s.as_str());
    let output_mode = extract_output_mode(matches);
    let extensions = extract_extensions(matches);

    let index = load_index(matches)?;
    let options = AnalyzeOptions::new()
        .base_path(get_str(matches, "base"))
        .root_label(get_str(matches, "root-label"))
        .filter(build_filter(matches)?);

    if extensions.len() > 1 {
        let bundle = analyze_bundle(&index, &options, &extensions)?;
        return render_bundle(&bundle, format, &listing, title, output_mode);
    }

    let options = match extensions.first() {
        Some(ext) if ext != ALL_EXTENSIONS => {
            let filter = options.filter.clone().extension(ext.as_str());
            options.filter(filter)
        }
        _ => options,
    };
    let treemap = analyze(&index, &options)?;
    debug!(
        "Treemap has {} files and {} directories",
        treemap.file_count(),
        treemap.directory_count()
    );
    render_treemap(&treemap, format, &listing, title, output_mode)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();

    let log_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
