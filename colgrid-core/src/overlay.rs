//! Overlay geometry for page previews.
//!
//! A renderer draws column edges as vertical lines, cutoff bands as
//! horizontal strips and detected words as outlined boxes over the page
//! image. This module only produces the coordinates and colors; it never
//! touches pixels.

use crate::layout::LayoutSnapshot;
use crate::types::{CutoffKind, Fragment};
use serde::{Deserialize, Serialize};

/// Colors assigned to columns in order, wrapping around
pub const PALETTE: [&str; 8] = [
    "blue", "green", "orange", "purple", "brown", "pink", "cyan", "magenta",
];

/// Vertical guide pair for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGuide {
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
    /// Where the column label sits (left edge)
    pub label_x: f64,
    pub color: String,
}

/// Shaded band for a header or footer cutoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffGuide {
    pub kind: CutoffKind,
    pub ymin: f64,
    pub ymax: f64,
    /// Inner edge facing the table body: header ymax, footer ymin
    pub edge_y: f64,
    pub label: String,
}

/// Outline of one detected fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentBox {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub columns: Vec<ColumnGuide>,
    pub cutoffs: Vec<CutoffGuide>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<FragmentBox>,
}

impl Overlay {
    pub fn from_snapshot(snapshot: &LayoutSnapshot) -> Self {
        let columns = snapshot
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| ColumnGuide {
                name: column.name.clone(),
                xmin: column.xmin,
                xmax: column.xmax,
                label_x: column.xmin,
                color: PALETTE[index % PALETTE.len()].to_string(),
            })
            .collect();

        let cutoffs = snapshot
            .cutoffs
            .iter()
            .map(|region| CutoffGuide {
                kind: region.kind,
                ymin: region.ymin,
                ymax: region.ymax,
                edge_y: match region.kind {
                    CutoffKind::Header => region.ymax,
                    CutoffKind::Footer => region.ymin,
                },
                label: match region.kind {
                    CutoffKind::Header => "Header cutoff".to_string(),
                    CutoffKind::Footer => "Footer cutoff".to_string(),
                },
            })
            .collect();

        Self {
            columns,
            cutoffs,
            fragments: Vec::new(),
        }
    }

    /// Add outlines for a page's fragments; invalid boxes are left out
    pub fn with_fragments(mut self, fragments: &[Fragment]) -> Self {
        self.fragments = fragments
            .iter()
            .filter(|f| f.has_valid_geometry())
            .map(|f| FragmentBox {
                text: f.text.clone(),
                x0: f.x0,
                x1: f.x1,
                y0: f.y0,
                y1: f.y1,
            })
            .collect();
        self
    }

    /// Same guides in display space, e.g. `scaled(2.0)` for a preview
    /// rendered at twice the page resolution
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| ColumnGuide {
                    xmin: c.xmin * factor,
                    xmax: c.xmax * factor,
                    label_x: c.label_x * factor,
                    ..c.clone()
                })
                .collect(),
            cutoffs: self
                .cutoffs
                .iter()
                .map(|c| CutoffGuide {
                    ymin: scale_bound(c.ymin, factor),
                    ymax: scale_bound(c.ymax, factor),
                    edge_y: c.edge_y * factor,
                    ..c.clone()
                })
                .collect(),
            fragments: self
                .fragments
                .iter()
                .map(|b| FragmentBox {
                    x0: b.x0 * factor,
                    x1: b.x1 * factor,
                    y0: b.y0 * factor,
                    y1: b.y1 * factor,
                    ..b.clone()
                })
                .collect(),
        }
    }

    /// Every distinct column edge x, ascending
    pub fn edge_positions(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = self
            .columns
            .iter()
            .flat_map(|c| [c.xmin, c.xmax])
            .collect();
        edges.sort_by(|a, b| a.total_cmp(b));
        edges.dedup();
        edges
    }
}

/// Open-ended bands use f64::MIN/MAX as page limits; keep those as-is
/// rather than overflowing to infinity
fn scale_bound(value: f64, factor: f64) -> f64 {
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled
    } else {
        value
    }
}
