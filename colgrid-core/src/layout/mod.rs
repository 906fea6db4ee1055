//! Page layout: column boundaries and header/footer cutoffs.
//!
//! A `Layout` is edited by the interaction layer between runs. Every
//! extraction works from a `LayoutSnapshot`, an immutable copy taken
//! before the run starts, so edits never reach an in-flight extraction.

pub mod boundary_set;
pub mod commands;
pub mod cutoffs;

pub use boundary_set::{BoundarySet, ColumnSpec};
pub use commands::{span_from_clicks, CommandOutcome, LayoutCommand};
pub use cutoffs::{Band, CutoffRegions};

use crate::error::LayoutError;
use crate::types::{ColumnDefinition, CutoffKind, CutoffRegion};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub boundaries: BoundarySet,
    pub cutoffs: CutoffRegions,
}

/// On-disk layout format (YAML or JSON)
///
/// Cutoffs can be given as explicit bands or, like the interactive tool,
/// as single lines (`header_line`, `footer_line`). Explicit bands win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutFile {
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub cutoffs: CutoffRegions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_line: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_line: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_height: Option<f64>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file_format(file: &LayoutFile) -> Result<Self, LayoutError> {
        let boundaries = BoundarySet::from_specs(&file.columns)?;
        file.cutoffs.validate()?;

        let mut cutoffs = file.cutoffs;
        let from_lines = CutoffRegions::from_lines(file.header_line, file.footer_line, file.page_height)?;
        for region in from_lines.regions() {
            if cutoffs.get(region.kind).is_none() {
                cutoffs.set(region.kind, region.ymin, region.ymax)?;
            }
        }

        Ok(Self { boundaries, cutoffs })
    }

    pub fn to_file_format(&self) -> LayoutFile {
        LayoutFile {
            columns: self.boundaries.to_specs(),
            cutoffs: self.cutoffs,
            header_line: None,
            footer_line: None,
            page_height: None,
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: LayoutFile = serde_yaml::from_str(content)?;
        Ok(Self::from_file_format(&file)?)
    }

    /// Load a layout file; `.json` is parsed as JSON, anything else as YAML
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: LayoutFile = if path.to_lowercase().ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(Self::from_file_format(&file)?)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let file = self.to_file_format();
        let content = if path.to_lowercase().ends_with(".json") {
            serde_json::to_string_pretty(&file)?
        } else {
            serde_yaml::to_string(&file)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            columns: self.boundaries.snapshot(),
            cutoffs: self.cutoffs.regions(),
        }
    }
}

/// Immutable layout view handed to a single extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Columns in order-index order
    pub columns: Vec<ColumnDefinition>,
    pub cutoffs: Vec<CutoffRegion>,
}

impl LayoutSnapshot {
    pub fn new(columns: Vec<ColumnDefinition>, cutoffs: Vec<CutoffRegion>) -> Self {
        let mut columns = columns;
        columns.sort_by_key(|c| c.order);
        Self { columns, cutoffs }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn cutoff(&self, kind: CutoffKind) -> Option<&CutoffRegion> {
        self.cutoffs.iter().find(|c| c.kind == kind)
    }

    /// Checks run before any fragment is touched
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns.is_empty() {
            return Err(LayoutError::NoColumns);
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            // cells and records are keyed by name
            if !seen.insert(column.name.trim()) {
                return Err(LayoutError::DuplicateName(column.name.clone()));
            }
            if !(column.xmin < column.xmax) {
                return Err(LayoutError::invalid_boundary(
                    &column.name,
                    format!("xmin ({}) must be less than xmax ({})", column.xmin, column.xmax),
                ));
            }
        }
        for region in &self.cutoffs {
            if !(region.ymin < region.ymax) {
                return Err(LayoutError::InvalidCutoff {
                    kind: region.kind,
                    ymin: region.ymin,
                    ymax: region.ymax,
                });
            }
        }
        Ok(())
    }
}

/// Built-in named layouts
#[derive(Debug, Clone)]
pub struct LayoutPresets {
    presets: HashMap<String, LayoutFile>,
}

impl LayoutPresets {
    pub fn new() -> Self {
        let mut presets = HashMap::new();
        presets.insert("borelog".to_string(), Self::borelog());
        Self { presets }
    }

    pub fn get(&self, name: &str) -> Option<Result<Layout, LayoutError>> {
        self.presets.get(name).map(Layout::from_file_format)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Borehole log sheets: narrow numeric columns, title block above
    /// y=160 and legend below y=570
    fn borelog() -> LayoutFile {
        let columns = [
            ("SoilType", 45.0, 50.0),
            ("SampleID", 85.0, 95.0),
            ("BlowCounts", 150.0, 190.0),
            ("CasingDepth_m", 195.0, 221.0),
            ("RodLength_m", 223.0, 245.0),
            ("EnergyRatio_%", 250.0, 272.0),
            ("PocketPen_kPa", 390.0, 410.0),
            ("Torvane_kPa", 410.0, 440.0),
            ("Moisture_%", 440.0, 460.0),
        ];
        LayoutFile {
            columns: columns
                .iter()
                .map(|(name, xmin, xmax)| ColumnSpec {
                    name: name.to_string(),
                    xmin: *xmin,
                    xmax: *xmax,
                })
                .collect(),
            cutoffs: CutoffRegions::default(),
            header_line: Some(160.0),
            footer_line: Some(570.0),
            page_height: None,
        }
    }
}

impl Default for LayoutPresets {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_layout_with_lines() {
        let yaml = r#"
columns:
  - name: Left
    xmin: 0
    xmax: 15
  - name: Right
    xmin: 15
    xmax: 35
header_line: 2
footer_line: 40
page_height: 60
"#;
        let layout = Layout::from_yaml_str(yaml).unwrap();
        let snapshot = layout.snapshot();
        assert_eq!(snapshot.column_names(), vec!["Left", "Right"]);
        assert_eq!(snapshot.cutoffs.len(), 2);
        let footer = snapshot.cutoff(CutoffKind::Footer).unwrap();
        assert_eq!((footer.ymin, footer.ymax), (40.0, 60.0));
    }

    #[test]
    fn test_explicit_band_wins_over_line() {
        let yaml = r#"
columns:
  - { name: A, xmin: 0, xmax: 10 }
cutoffs:
  footer: { ymin: 8, ymax: 20 }
footer_line: 500
"#;
        let layout = Layout::from_yaml_str(yaml).unwrap();
        let footer = layout.cutoffs.get(CutoffKind::Footer).unwrap();
        assert_eq!((footer.ymin, footer.ymax), (8.0, 20.0));
    }

    #[test]
    fn test_yaml_layout_rejects_bad_columns() {
        let yaml = r#"
columns:
  - { name: A, xmin: 10, xmax: 5 }
"#;
        assert!(Layout::from_yaml_str(yaml).is_err());

        let duplicate = r#"
columns:
  - { name: A, xmin: 0, xmax: 5 }
  - { name: A, xmin: 5, xmax: 9 }
"#;
        assert!(Layout::from_yaml_str(duplicate).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut layout = Layout::new();
        layout.boundaries.add("Depth", 0.0, 40.0).unwrap();
        layout.cutoffs.set(CutoffKind::Header, 0.0, 120.0).unwrap();

        let path = std::env::temp_dir().join("colgrid_layout_roundtrip.yaml");
        let path = path.to_string_lossy().to_string();
        layout.save_to_file(&path).unwrap();
        let loaded = Layout::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, layout);
    }

    #[test]
    fn test_snapshot_validate_requires_columns() {
        let layout = Layout::new();
        assert_eq!(layout.snapshot().validate(), Err(LayoutError::NoColumns));
    }

    #[test]
    fn test_snapshot_validate_rejects_duplicate_names() {
        let columns = vec![
            ColumnDefinition { name: "D".into(), xmin: 0.0, xmax: 10.0, order: 0 },
            ColumnDefinition { name: "D".into(), xmin: 10.0, xmax: 20.0, order: 1 },
        ];
        let snapshot = LayoutSnapshot::new(columns, Vec::new());
        assert_eq!(
            snapshot.validate(),
            Err(LayoutError::DuplicateName("D".to_string()))
        );
    }

    #[test]
    fn test_snapshot_new_sorts_by_order() {
        let columns = vec![
            ColumnDefinition { name: "B".into(), xmin: 10.0, xmax: 20.0, order: 1 },
            ColumnDefinition { name: "A".into(), xmin: 0.0, xmax: 10.0, order: 0 },
        ];
        let snapshot = LayoutSnapshot::new(columns, Vec::new());
        assert_eq!(snapshot.column_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_borelog_preset() {
        let presets = LayoutPresets::new();
        assert_eq!(presets.names(), vec!["borelog"]);
        let layout = presets.get("borelog").unwrap().unwrap();
        assert_eq!(layout.boundaries.len(), 9);
        assert_eq!(layout.boundaries.names()[0], "SoilType");
        let header = layout.cutoffs.get(CutoffKind::Header).unwrap();
        assert_eq!(header.ymax, 160.0);
        assert!(presets.get("missing").is_none());
    }
}
