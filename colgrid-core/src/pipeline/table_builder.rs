use super::column_assignment::AssignedRow;
use crate::types::{ColumnDefinition, Fragment, PageIndex, RowBand, Table};
use std::cmp::Ordering;

const CELL_SEPARATOR: &str = " ";

/// Turns column-bucketed rows into cell strings and assembles a page table
pub struct TableBuilder<'a> {
    columns: &'a [ColumnDefinition],
}

impl<'a> TableBuilder<'a> {
    pub fn new(columns: &'a [ColumnDefinition]) -> Self {
        Self { columns }
    }

    pub fn schema(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Build one page's table. Rows that lost every fragment to the gap
    /// policy are omitted; every kept row carries one cell per column.
    pub fn build(&self, page: PageIndex, rows: Vec<AssignedRow<'_>>) -> Table {
        let mut table = Table::new(self.schema());
        for row in rows {
            if row.is_empty() {
                continue;
            }
            table.rows.push(self.build_row(page, row));
        }
        table
    }

    fn build_row(&self, page: PageIndex, row: AssignedRow<'_>) -> RowBand {
        let cells = row
            .cells
            .into_iter()
            .map(|mut fragments| {
                fragments.sort_by(|a, b| reading_order(a, b));
                merge_cell_text(&fragments)
            })
            .collect();

        RowBand {
            page,
            y_center: row.y_center,
            cells,
        }
    }
}

/// Join fragment texts with a single space; no fragments → empty string
pub fn merge_cell_text(fragments: &[&Fragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

fn reading_order(a: &Fragment, b: &Fragment) -> Ordering {
    a.x0.total_cmp(&b.x0)
        .then_with(|| a.y0.total_cmp(&b.y0))
        .then_with(|| a.text.cmp(&b.text))
}
