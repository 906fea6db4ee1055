//! Discrete layout edits.
//!
//! The interaction layer (click capture, form inputs) turns user gestures
//! into `LayoutCommand`s and applies them between extraction runs. The
//! extraction core only ever sees the resulting snapshot.

use super::Layout;
use crate::error::LayoutError;
use crate::types::CutoffKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum LayoutCommand {
    AddColumn { name: String, xmin: f64, xmax: f64 },
    AddDefaultColumn { xmin: f64, xmax: f64 },
    RenameColumn { old_name: String, new_name: String },
    RemoveColumn { name: String },
    ReorderColumn { name: String, new_index: usize },
    ResizeColumn { name: String, xmin: f64, xmax: f64 },
    SetCutoff { kind: CutoffKind, ymin: f64, ymax: f64 },
    ClearCutoff { kind: CutoffKind },
}

/// What a successfully applied command changed
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    ColumnAdded(String),
    ColumnRenamed { from: String, to: String },
    ColumnRemoved(String),
    ColumnMoved { name: String, index: usize },
    ColumnResized(String),
    CutoffSet(CutoffKind),
    CutoffCleared(CutoffKind),
}

impl Layout {
    /// Apply one edit. A failed command leaves the layout untouched.
    pub fn apply(&mut self, command: LayoutCommand) -> Result<CommandOutcome, LayoutError> {
        match command {
            LayoutCommand::AddColumn { name, xmin, xmax } => {
                self.boundaries.add(&name, xmin, xmax)?;
                Ok(CommandOutcome::ColumnAdded(name.trim().to_string()))
            }
            LayoutCommand::AddDefaultColumn { xmin, xmax } => {
                let name = self.boundaries.add_default(xmin, xmax)?;
                Ok(CommandOutcome::ColumnAdded(name))
            }
            LayoutCommand::RenameColumn { old_name, new_name } => {
                self.boundaries.rename(&old_name, &new_name)?;
                Ok(CommandOutcome::ColumnRenamed {
                    from: old_name,
                    to: new_name.trim().to_string(),
                })
            }
            LayoutCommand::RemoveColumn { name } => {
                let removed = self.boundaries.remove(&name)?;
                Ok(CommandOutcome::ColumnRemoved(removed.name))
            }
            LayoutCommand::ReorderColumn { name, new_index } => {
                self.boundaries.reorder(&name, new_index)?;
                Ok(CommandOutcome::ColumnMoved {
                    name,
                    index: new_index,
                })
            }
            LayoutCommand::ResizeColumn { name, xmin, xmax } => {
                self.boundaries.resize(&name, xmin, xmax)?;
                Ok(CommandOutcome::ColumnResized(name))
            }
            LayoutCommand::SetCutoff { kind, ymin, ymax } => {
                self.cutoffs.set(kind, ymin, ymax)?;
                Ok(CommandOutcome::CutoffSet(kind))
            }
            LayoutCommand::ClearCutoff { kind } => {
                self.cutoffs.clear(kind);
                Ok(CommandOutcome::CutoffCleared(kind))
            }
        }
    }
}

/// Convert two clicks on a scaled page preview into a page-coordinate span.
///
/// Clicks may arrive in either order; the result is always (xmin, xmax).
pub fn span_from_clicks(first: f64, second: f64, display_scale: f64) -> (f64, f64) {
    let scale = if display_scale > 0.0 { display_scale } else { 1.0 };
    let (low, high) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };
    (low / scale, high / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sequence() {
        let mut layout = Layout::new();
        let outcome = layout
            .apply(LayoutCommand::AddDefaultColumn {
                xmin: 10.0,
                xmax: 50.0,
            })
            .unwrap();
        assert_eq!(outcome, CommandOutcome::ColumnAdded("NewColumn1".to_string()));

        layout
            .apply(LayoutCommand::RenameColumn {
                old_name: "NewColumn1".to_string(),
                new_name: "SoilType".to_string(),
            })
            .unwrap();
        layout
            .apply(LayoutCommand::AddColumn {
                name: "SampleID".to_string(),
                xmin: 85.0,
                xmax: 95.0,
            })
            .unwrap();
        layout
            .apply(LayoutCommand::ReorderColumn {
                name: "SampleID".to_string(),
                new_index: 0,
            })
            .unwrap();
        layout
            .apply(LayoutCommand::SetCutoff {
                kind: CutoffKind::Header,
                ymin: 0.0,
                ymax: 160.0,
            })
            .unwrap();

        let snapshot = layout.snapshot();
        assert_eq!(snapshot.column_names(), vec!["SampleID", "SoilType"]);
        assert_eq!(snapshot.cutoffs.len(), 1);
    }

    #[test]
    fn test_failed_command_leaves_layout_unchanged() {
        let mut layout = Layout::new();
        layout
            .apply(LayoutCommand::AddColumn {
                name: "A".to_string(),
                xmin: 0.0,
                xmax: 10.0,
            })
            .unwrap();
        let before = layout.clone();

        let err = layout
            .apply(LayoutCommand::ResizeColumn {
                name: "A".to_string(),
                xmin: 10.0,
                xmax: 0.0,
            })
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidBoundary { .. }));
        assert_eq!(layout, before);
    }

    #[test]
    fn test_commands_deserialize_from_json() {
        let json = r#"[
            {"command": "add_column", "name": "Depth", "xmin": 0.0, "xmax": 40.0},
            {"command": "set_cutoff", "kind": "footer", "ymin": 570.0, "ymax": 842.0},
            {"command": "clear_cutoff", "kind": "footer"}
        ]"#;
        let commands: Vec<LayoutCommand> = serde_json::from_str(json).unwrap();
        let mut layout = Layout::new();
        for command in commands {
            layout.apply(command).unwrap();
        }
        assert_eq!(layout.boundaries.len(), 1);
        assert!(layout.cutoffs.is_empty());
    }

    #[test]
    fn test_span_from_clicks() {
        assert_eq!(span_from_clicks(300.0, 100.0, 2.0), (50.0, 150.0));
        assert_eq!(span_from_clicks(100.0, 300.0, 2.0), (50.0, 150.0));
        assert_eq!(span_from_clicks(10.0, 20.0, 0.0), (10.0, 20.0));
    }
}
