use crate::types::Table;
use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::io::Write;

/// Column added to flat exports to tag each row with its page
pub const PAGE_COLUMN: &str = "Page";

impl Table {
    /// Key for the page tag: `Page`, or `_page` (more underscores as
    /// needed) when a user column already takes the name
    pub fn page_column(&self) -> String {
        let mut name = PAGE_COLUMN.to_string();
        if self.columns.iter().any(|c| *c == name) {
            name = "_page".to_string();
            while self.columns.iter().any(|c| *c == name) {
                name.insert(0, '_');
            }
        }
        name
    }

    /// One JSON object per row, keyed by column name, plus the page tag
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        let page_column = self.page_column();
        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                for (name, text) in self.columns.iter().zip(&row.cells) {
                    record.insert(name.clone(), Value::String(text.clone()));
                }
                record.insert(page_column.clone(), Value::from(row.page));
                record
            })
            .collect()
    }

    /// Header row followed by one row per band. With `include_page` a
    /// trailing page column is appended, named by [`Table::page_column`].
    pub fn to_grid(&self, include_page: bool) -> Vec<Vec<String>> {
        let mut header = self.columns.clone();
        if include_page {
            header.push(self.page_column());
        }

        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(header);
        for row in &self.rows {
            let mut line = row.cells.clone();
            if include_page {
                line.push(row.page.to_string());
            }
            grid.push(line);
        }
        grid
    }

    pub fn write_csv<W: Write>(&self, writer: W, include_page: bool) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
        for line in self.to_grid(include_page) {
            csv_writer.write_record(&line)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self, include_page: bool) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, include_page)?;
        String::from_utf8(buffer).map_err(|e| anyhow!("CSV output is not valid UTF-8: {}", e))
    }

    pub fn save_to_json(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Save as `table` (native JSON), `records` (JSON objects) or `csv`
    pub fn save_with_format(&self, path: &str, format: &str) -> Result<()> {
        match format {
            "records" => {
                let json = serde_json::to_string_pretty(&self.to_records())?;
                std::fs::write(path, json)?;
            }
            "csv" => {
                let file = std::fs::File::create(path)
                    .map_err(|e| anyhow!("Failed to create output file {}: {}", path, e))?;
                self.write_csv(file, true)?;
            }
            "table" => self.save_to_json(path)?,
            other => {
                log::warn!("⚠️  Unknown output format '{}', writing 'table'", other);
                self.save_to_json(path)?;
            }
        }
        Ok(())
    }
}

/// File extension matching an output format
pub fn extension_for_format(format: &str) -> &'static str {
    match format {
        "csv" => "csv",
        _ => "json",
    }
}
