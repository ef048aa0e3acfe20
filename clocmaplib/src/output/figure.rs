//! Treemap figure description for plotly-style renderers.
//!
//! Tile area is `log10(code + 1)` so a few huge files do not flatten the
//! rest of the map, and tile color is the share of comment lines, clamped
//! to `[0, 0.4]` on the color scale. Parent values are not sums of their
//! children's (log-scaled) values, hence `branchvalues = "remainder"`.

use serde::Serialize;

use crate::data::flatten::Treemap;

/// Color scale bounds for the comment ratio.
pub const COMMENT_RATIO_RANGE: [f64; 2] = [0.0, 0.4];

/// A renderable figure: one treemap trace plus layout.
#[derive(Debug, Clone, Serialize)]
pub struct TreemapFigure {
    pub data: Vec<TreemapTrace>,
    pub layout: Layout,
}

/// The treemap trace.
#[derive(Debug, Clone, Serialize)]
pub struct TreemapTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<f64>,
    pub branchvalues: &'static str,
    /// `[code, comment, blank, comment ratio]` per tile, for hover text
    pub customdata: Vec<(u64, u64, u64, f64)>,
    pub hovertemplate: String,
    pub marker: Marker,
}

/// Tile coloring.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub colors: Vec<f64>,
    pub colorscale: &'static str,
    pub cmin: f64,
    pub cmax: f64,
    pub showscale: bool,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub margin: Margin,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub t: u32,
    pub l: u32,
    pub r: u32,
    pub b: u32,
}

impl TreemapFigure {
    /// Describe `treemap` as a figure, with an optional title.
    pub fn from_treemap(treemap: &Treemap, title: Option<String>) -> Self {
        let records = &treemap.records;
        let trace = TreemapTrace {
            kind: "treemap",
            ids: records.iter().map(|r| r.id.clone()).collect(),
            labels: records.iter().map(|r| r.name.clone()).collect(),
            parents: records.iter().map(|r| r.parent.clone()).collect(),
            values: records.iter().map(|r| tile_value(r.counts.code)).collect(),
            branchvalues: "remainder",
            customdata: records
                .iter()
                .map(|r| {
                    let c = r.counts;
                    (c.code, c.comment, c.blank, c.comment_ratio())
                })
                .collect(),
            hovertemplate: concat!(
                "<b>%{label}</b><br>",
                "Lines of Code: %{customdata[0]}<br>",
                "Comment Lines: %{customdata[1]}<br>",
                "Blank Lines: %{customdata[2]}<br>",
                "% Comments: %{customdata[3]:.1%}",
                "<extra></extra>"
            )
            .to_string(),
            marker: Marker {
                colors: records.iter().map(|r| r.counts.comment_ratio()).collect(),
                colorscale: "RdYlGn",
                cmin: COMMENT_RATIO_RANGE[0],
                cmax: COMMENT_RATIO_RANGE[1],
                showscale: true,
                colorbar: ColorBar {
                    title: "% Comments".to_string(),
                },
            },
        };

        let top = if title.is_some() { 50 } else { 25 };
        TreemapFigure {
            data: vec![trace],
            layout: Layout {
                title,
                margin: Margin {
                    t: top,
                    l: 25,
                    r: 25,
                    b: 25,
                },
            },
        }
    }
}

/// Tile area for a node with `code` lines.
pub fn tile_value(code: u64) -> f64 {
    (code as f64 + 1.0).log10()
}
