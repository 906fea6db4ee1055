//! Multi-page extraction.
//!
//! `TableExtractor` runs the page pipeline over a set of pages and stitches
//! the per-page tables into one, always in ascending page order. The column
//! schema comes from the snapshot taken before the run, so every page shares
//! it.

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::fingerprint::{layout_fingerprint, table_digest};
use crate::layout::LayoutSnapshot;
use crate::pipeline::{PageExtractor, PageOutcome, PageStats};
use crate::types::{Fragment, FragmentDocument, PageIndex, Table};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use uuid::Uuid;

/// What happened during one extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// sha256 of the layout snapshot and clustering/assignment settings
    pub layout_fingerprint: String,
    /// sha256 of the serialized table; equal digests mean identical output
    pub table_digest: String,
    pub columns: Vec<String>,
    /// Stats for every page that was aggregated, ascending
    pub pages: Vec<PageStats>,
    /// Requested pages skipped because the run was cancelled
    pub skipped_pages: Vec<PageIndex>,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

impl ExtractionReport {
    pub fn total_rows(&self) -> usize {
        self.pages.iter().map(|p| p.rows).sum()
    }

    pub fn total_fragments(&self) -> usize {
        self.pages.iter().map(|p| p.fragments).sum()
    }

    pub fn total_cut_off(&self) -> usize {
        self.pages.iter().map(|p| p.cut_off).sum()
    }

    pub fn total_dropped(&self) -> usize {
        self.pages.iter().map(|p| p.dropped).sum()
    }

    pub fn total_invalid(&self) -> usize {
        self.pages.iter().map(|p| p.invalid).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub table: Table,
    pub report: ExtractionReport,
}

/// Runs extractions over an in-memory fragment document
pub struct TableExtractor<'a> {
    document: &'a FragmentDocument,
    config: &'a ExtractionConfig,
}

impl<'a> TableExtractor<'a> {
    pub fn new(document: &'a FragmentDocument, config: &'a ExtractionConfig) -> Self {
        Self { document, config }
    }

    pub fn document(&self) -> &FragmentDocument {
        self.document
    }

    /// Extract a single page
    pub fn extract_page(
        &self,
        page: PageIndex,
        snapshot: &LayoutSnapshot,
    ) -> Result<Table, ExtractionError> {
        let extractor = PageExtractor::new(snapshot, self.config)?;
        let fragments = self.fragments_for(page)?;
        Ok(extractor.extract(page, fragments)?.table)
    }

    /// Extract `pages` (any order, duplicates ignored) into one table
    pub fn extract_all(
        &self,
        pages: &[PageIndex],
        snapshot: &LayoutSnapshot,
    ) -> Result<Table, ExtractionError> {
        Ok(self.extract_with_report(pages, snapshot, None)?.table)
    }

    /// Extract every page present in the document
    pub fn extract_document(&self, snapshot: &LayoutSnapshot) -> Result<Table, ExtractionError> {
        self.extract_all(&self.document.page_numbers(), snapshot)
    }

    /// Full run with statistics. When `cancel` is raised, pages that have
    /// not started yet are skipped and listed in the report; pages already
    /// finished stay in the table.
    pub fn extract_with_report(
        &self,
        pages: &[PageIndex],
        snapshot: &LayoutSnapshot,
        cancel: Option<&AtomicBool>,
    ) -> Result<Extraction, ExtractionError> {
        let start = Instant::now();

        // Validation happens before any page is touched
        let extractor = PageExtractor::new(snapshot, self.config)?;
        let pages = normalize_pages(pages);
        let work: Vec<(PageIndex, &[Fragment])> = pages
            .iter()
            .map(|&page| Ok((page, self.fragments_for(page)?)))
            .collect::<Result<_, ExtractionError>>()?;

        log::info!(
            "🚀 Extracting {} pages with {} columns{}",
            work.len(),
            snapshot.columns.len(),
            if self.config.parallel { " (parallel)" } else { "" }
        );

        let is_cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));
        let run_page = |&(page, fragments): &(PageIndex, &[Fragment])| {
            if is_cancelled() {
                return Ok(None);
            }
            extractor.extract(page, fragments).map(Some)
        };

        // Indexed collect keeps input order, so results stay ascending
        let outcomes: Vec<Option<PageOutcome>> = if self.config.parallel {
            work.par_iter()
                .map(run_page)
                .collect::<Result<_, ExtractionError>>()?
        } else {
            work.iter()
                .map(run_page)
                .collect::<Result<_, ExtractionError>>()?
        };

        let mut table = Table::new(snapshot.column_names());
        let mut stats = Vec::with_capacity(outcomes.len());
        let mut skipped_pages = Vec::new();
        for ((page, _), outcome) in work.iter().zip(outcomes) {
            match outcome {
                Some(outcome) => {
                    table.rows.extend(outcome.table.rows);
                    stats.push(outcome.stats);
                }
                None => skipped_pages.push(*page),
            }
        }

        let cancelled = !skipped_pages.is_empty();
        if cancelled {
            log::warn!(
                "🛑 Extraction cancelled: {} of {} pages skipped",
                skipped_pages.len(),
                work.len()
            );
        }

        let layout_fingerprint = layout_fingerprint(snapshot, self.config).unwrap_or_else(|e| {
            log::warn!("⚠️  Could not fingerprint layout: {}", e);
            String::new()
        });
        let table_digest = table_digest(&table).unwrap_or_else(|e| {
            log::warn!("⚠️  Could not hash table: {}", e);
            String::new()
        });

        let report = ExtractionReport {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            layout_fingerprint,
            table_digest,
            columns: table.columns.clone(),
            pages: stats,
            skipped_pages,
            cancelled,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        log::info!(
            "✅ Extracted {} rows from {} pages in {}ms",
            report.total_rows(),
            report.pages.len(),
            report.elapsed_ms
        );

        Ok(Extraction { table, report })
    }

    fn fragments_for(&self, page: PageIndex) -> Result<&'a [Fragment], ExtractionError> {
        self.document
            .page(page)
            .map(|p| p.fragments.as_slice())
            .ok_or(ExtractionError::UnknownPage(page))
    }
}

/// Ascending, without duplicates
fn normalize_pages(pages: &[PageIndex]) -> Vec<PageIndex> {
    let mut pages = pages.to_vec();
    pages.sort_unstable();
    pages.dedup();
    pages
}
