// Colgrid Core Library
//
// Rebuilds tables from positioned text fragments using user-drawn column
// boundaries and header/footer cutoffs.
// Main interface: take a LayoutSnapshot, hand it to a TableExtractor.

pub mod types;
pub mod error;
pub mod config;
pub mod layout;
pub mod pipeline;
pub mod aggregator;
pub mod fingerprint;
pub mod export;
pub mod sources;
pub mod overlay;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{ExtractionError, LayoutError};
pub use config::{AssignmentConfig, DebugConfig, ExtractionConfig, GapPolicy, RowClusteringConfig};
pub use layout::{
    span_from_clicks, BoundarySet, CommandOutcome, CutoffRegions, Layout, LayoutCommand,
    LayoutFile, LayoutPresets, LayoutSnapshot,
};
pub use pipeline::{PageExtractor, PageStats};
pub use aggregator::{Extraction, ExtractionReport, TableExtractor};
pub use sources::{source_for_path, FragmentSource, JsonFragmentSource, XhtmlFragmentSource};
pub use overlay::{ColumnGuide, CutoffGuide, FragmentBox, Overlay};
