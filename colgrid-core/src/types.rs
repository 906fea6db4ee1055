use serde::{Deserialize, Serialize};
use std::fmt;

/// Page number as used by the fragment supplier (1-indexed)
pub type PageIndex = u32;

// ===== INPUT TYPES =====
// Produced by the document-parsing collaborator. The core never mutates them.

/// One atomic unit of positioned text on a page.
///
/// Coordinates are page-local with the origin at the top-left corner and
/// y growing downward, so `y0` is the top edge and `y1` the bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    #[serde(default)]
    pub page: PageIndex,
}

impl Fragment {
    pub fn new(text: impl Into<String>, x0: f64, x1: f64, y0: f64, y1: f64, page: PageIndex) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            y0,
            y1,
            page,
        }
    }

    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Finite coordinates with x0 < x1 and y0 < y1
    pub fn has_valid_geometry(&self) -> bool {
        [self.x0, self.x1, self.y0, self.y1]
            .iter()
            .all(|v| v.is_finite())
            && self.x0 < self.x1
            && self.y0 < self.y1
    }
}

/// All fragments for a single page, plus the page size when the supplier knows it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFragments {
    pub page: PageIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub fragments: Vec<Fragment>,
}

impl PageFragments {
    pub fn new(page: PageIndex, fragments: Vec<Fragment>) -> Self {
        Self {
            page,
            width: None,
            height: None,
            fragments,
        }
    }
}

/// In-memory fragment supply for a whole document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentDocument {
    pub pages: Vec<PageFragments>,
}

impl FragmentDocument {
    /// Pages sharing a number are merged in input order, so a page listed
    /// twice keeps every fragment. Pages come out ascending.
    pub fn new(pages: Vec<PageFragments>) -> Self {
        let mut merged: Vec<PageFragments> = Vec::with_capacity(pages.len());
        for page in pages {
            match merged.iter_mut().find(|p| p.page == page.page) {
                Some(existing) => {
                    log::warn!(
                        "⚠️  Page {} listed more than once, merging {} more fragments",
                        page.page,
                        page.fragments.len()
                    );
                    existing.width = existing.width.or(page.width);
                    existing.height = existing.height.or(page.height);
                    existing.fragments.extend(page.fragments);
                }
                None => merged.push(page),
            }
        }
        merged.sort_by_key(|p| p.page);
        Self { pages: merged }
    }

    /// Group a flat fragment list by each fragment's page field
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let mut pages: Vec<PageFragments> = Vec::new();
        for fragment in fragments {
            match pages.iter_mut().find(|p| p.page == fragment.page) {
                Some(page) => page.fragments.push(fragment),
                None => pages.push(PageFragments::new(fragment.page, vec![fragment])),
            }
        }
        pages.sort_by_key(|p| p.page);
        Self { pages }
    }

    pub fn page(&self, page: PageIndex) -> Option<&PageFragments> {
        self.pages.iter().find(|p| p.page == page)
    }

    /// Page numbers present in the document, ascending
    pub fn page_numbers(&self) -> Vec<PageIndex> {
        let mut numbers: Vec<PageIndex> = self.pages.iter().map(|p| p.page).collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    pub fn page_count(&self) -> usize {
        self.page_numbers().len()
    }

    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|p| p.fragments.len()).sum()
    }
}

// ===== LAYOUT TYPES =====

/// A named vertical slice of the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
    /// Left-to-right presentation order, independent of creation order
    pub order: usize,
}

impl ColumnDefinition {
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x > self.xmin && x < self.xmax
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutoffKind {
    Header,
    Footer,
}

impl fmt::Display for CutoffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutoffKind::Header => write!(f, "header"),
            CutoffKind::Footer => write!(f, "footer"),
        }
    }
}

/// A vertical band excluded from row reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoffRegion {
    pub kind: CutoffKind,
    pub ymin: f64,
    pub ymax: f64,
}

impl CutoffRegion {
    /// Strict interior test; a center lying exactly on an edge is kept
    pub fn contains_y(&self, y: f64) -> bool {
        y > self.ymin && y < self.ymax
    }
}

// ===== OUTPUT TYPES =====

/// A reconstructed row. `cells` lines up positionally with the owning
/// table's `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBand {
    pub page: PageIndex,
    pub y_center: f64,
    pub cells: Vec<String>,
}

/// Ordered grid of cell values for one or more pages
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Column schema snapshot, in order-index order
    pub columns: Vec<String>,
    pub rows: Vec<RowBand>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell text for `row` under column `name`
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column_index(name)?;
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(column))
            .map(String::as_str)
    }

    /// (column name, cell text) pairs for one row, in schema order
    pub fn row_entries(&self, row: usize) -> Vec<(&str, &str)> {
        match self.rows.get(row) {
            Some(r) => self
                .columns
                .iter()
                .map(String::as_str)
                .zip(r.cells.iter().map(String::as_str))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Distinct pages contributing rows, in row order
    pub fn pages(&self) -> Vec<PageIndex> {
        let mut pages: Vec<PageIndex> = Vec::new();
        for row in &self.rows {
            if pages.last() != Some(&row.page) {
                pages.push(row.page);
            }
        }
        pages
    }

    /// Append `other`'s rows. Returns false (and appends nothing) when the
    /// schemas differ.
    pub fn concat(&mut self, other: Table) -> bool {
        if self.columns != other.columns {
            return false;
        }
        self.rows.extend(other.rows);
        true
    }
}
