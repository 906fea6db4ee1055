//! Single-page extraction pipeline.
//!
//! ```text
//! fragments → CutoffFilter → RowClusterer → ColumnAssigner → TableBuilder → Table
//! ```
//!
//! Each stage is pure and works from the run's `LayoutSnapshot`, so a page
//! can be extracted on any thread without touching shared state.

pub mod column_assignment;
pub mod cutoff_filter;
pub mod profiler;
pub mod row_clustering;
pub mod table_builder;
pub mod trace;

pub use column_assignment::{AssignedRow, ColumnAssigner};
pub use cutoff_filter::CutoffFilter;
pub use profiler::StepProfiler;
pub use row_clustering::{RowCluster, RowClusterer};
pub use table_builder::TableBuilder;
pub use trace::FragmentTracer;

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::layout::LayoutSnapshot;
use crate::types::{Fragment, PageIndex, Table};
use serde::{Deserialize, Serialize};

/// Counters for one page of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageStats {
    pub page: PageIndex,
    /// Fragments supplied for the page
    pub fragments: usize,
    /// Skipped for non-finite or inverted boxes
    pub invalid: usize,
    /// Removed by header/footer bands
    pub cut_off: usize,
    /// Rejected by the column gap policy
    pub dropped: usize,
    pub rows: usize,
    /// Row clustering tolerance used for this page (points)
    pub row_tolerance: f64,
}

#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub table: Table,
    pub stats: PageStats,
}

/// Runs the stage sequence for individual pages against one snapshot
pub struct PageExtractor<'a> {
    snapshot: &'a LayoutSnapshot,
    config: &'a ExtractionConfig,
    tracer: FragmentTracer,
}

impl<'a> PageExtractor<'a> {
    /// Validates the snapshot and config up front; a failure here means no
    /// page is processed.
    pub fn new(
        snapshot: &'a LayoutSnapshot,
        config: &'a ExtractionConfig,
    ) -> Result<Self, ExtractionError> {
        snapshot.validate()?;
        config.validate().map_err(ExtractionError::InvalidConfig)?;
        Ok(Self {
            snapshot,
            config,
            tracer: FragmentTracer::new(&config.debug),
        })
    }

    pub fn extract(
        &self,
        page: PageIndex,
        fragments: &[Fragment],
    ) -> Result<PageOutcome, ExtractionError> {
        let mut profiler = StepProfiler::new(self.config.profile);
        let mut stats = PageStats {
            page,
            fragments: fragments.len(),
            ..PageStats::default()
        };

        self.tracer.trace("Input", fragments);

        let valid: Vec<&Fragment> = profiler.time_step("0. Geometry check", || {
            fragments.iter().filter(|f| f.has_valid_geometry()).collect()
        });
        stats.invalid = fragments.len() - valid.len();
        if stats.invalid > 0 {
            log::warn!(
                "⚠️  Page {}: skipped {} fragments with invalid bounding boxes",
                page,
                stats.invalid
            );
        }

        let filter = CutoffFilter::new(&self.snapshot.cutoffs);
        let (kept, cut_off) = profiler.time_step("1. CutoffFilter", || filter.apply(valid));
        stats.cut_off = cut_off;
        self.tracer.trace("CutoffFilter", kept.iter().copied());

        let clusterer = RowClusterer::new(&self.config.row_clustering);
        stats.row_tolerance = clusterer.tolerance_for(&kept);
        let bands = profiler.time_step("2. RowClusterer", || clusterer.cluster(kept));
        self.tracer
            .trace("RowClusterer", bands.iter().flat_map(|b| b.members.iter().copied()));

        let assigner = ColumnAssigner::new(&self.snapshot.columns, &self.config.assignment)?;
        let (rows, dropped) = profiler.time_step("3. ColumnAssigner", || assigner.assign_rows(&bands));
        stats.dropped = dropped;
        self.tracer.trace(
            "ColumnAssigner",
            rows.iter()
                .flat_map(|r| r.cells.iter().flat_map(|c| c.iter().copied())),
        );

        let builder = TableBuilder::new(&self.snapshot.columns);
        let table = profiler.time_step("4. TableBuilder", || builder.build(page, rows));
        stats.rows = table.len();

        log::debug!(
            "   📄 Page {}: {} fragments → {} cut off, {} dropped, {} rows",
            page,
            stats.fragments,
            stats.cut_off,
            stats.dropped,
            stats.rows
        );
        profiler.log_summary(&format!("page {page}"));

        Ok(PageOutcome { table, stats })
    }
}
