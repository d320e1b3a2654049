//! Orchestrator module: one comparison run from upload to workbook, plus the read-side views
//! (result, brand stats, download) over the stored artifact.

pub mod summary;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::NicheError;
use crate::export::{MATCHED_SHEET, UNMATCHED_SHEET, write_comparison_workbook};
use crate::ingest::{ReferenceLocation, find_upload, load_reference_ids, read_sheet, store_upload};
use crate::matching::{DedupOutcome, dedup_unmatched, partition_by_reference};
use crate::models::{ProductTable, ReferenceIds};
use crate::stats::{BrandReport, brand_stats};
use summary::{RunSummary, SummaryBuilder, collect_brands};

pub const OUTPUT_FILE_NAME: &str = "compare_product_id_vs_title.xlsx";

/// Paths and reference source for a run, built once per invocation.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub upload_dir: PathBuf,
    pub output_path: PathBuf,
    pub max_upload_bytes: u64,
    pub reference: Option<ReferenceLocation>,
    pub id_column: String,
}

impl RunContext {
    pub fn from_config(cfg: &AppConfig) -> Self {
        let upload_dir = PathBuf::from(&cfg.upload.folder);
        Self {
            output_path: upload_dir.join(OUTPUT_FILE_NAME),
            upload_dir,
            max_upload_bytes: cfg.upload.max_content_length,
            reference: cfg.reference.location().ok(),
            id_column: cfg.reference.id_column.clone(),
        }
    }
}

/// Result of the match and dedup passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub matched: ProductTable,
    pub unmatched_original: usize,
    pub dedup: DedupOutcome,
}

impl Comparison {
    pub fn unmatched(&self) -> &ProductTable {
        &self.dedup.unmatched
    }
}

/// Summary plus the row records of both output tables.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub matched_data: Vec<Map<String, Value>>,
    pub unmatched_data: Vec<Map<String, Value>>,
}

impl ComparisonReport {
    fn new(summary: RunSummary, matched: &ProductTable, unmatched: &ProductTable) -> Self {
        Self {
            summary,
            matched_data: matched.to_records(),
            unmatched_data: unmatched.to_records(),
        }
    }
}

/// Match titles against the checklist, then dedup the leftovers by product number.
pub fn compare(ids: &ReferenceIds, table: ProductTable) -> Comparison {
    let partition = partition_by_reference(ids, table);
    let unmatched_original = partition.unmatched.len();
    let dedup = dedup_unmatched(partition.unmatched);
    Comparison {
        matched: partition.matched,
        unmatched_original,
        dedup,
    }
}

/// Store the user's file as the current upload and run the comparison on it.
pub async fn process_upload(ctx: &RunContext, source: &Path) -> Result<ComparisonReport, NicheError> {
    let upload = store_upload(source, &ctx.upload_dir, ctx.max_upload_bytes)?;
    run_pipeline(ctx, &upload).await
}

/// Load the checklist and the listing, compare, and write the two-sheet workbook.
pub async fn run_pipeline(ctx: &RunContext, upload: &Path) -> Result<ComparisonReport, NicheError> {
    let started = Utc::now();
    let reference = ctx.reference.as_ref().ok_or_else(|| {
        NicheError::ReadFailure("no checklist source configured (CHECKLIST_URL)".into())
    })?;

    let t0 = Instant::now();
    let ids = load_reference_ids(reference, &ctx.id_column).await?;
    let sheet = read_sheet(upload, None)?;
    log::info!("Read {} listing rows from {}", sheet.len(), upload.display());
    let table = ProductTable::from_sheet(sheet)?;
    log::debug!("inputs loaded in {:?}", t0.elapsed());

    let t1 = Instant::now();
    let cmp = compare(&ids, table);
    log::info!(
        "Matched {} rows; {} unmatched, {} after dedup ({} duplicates dropped)",
        cmp.matched.len(),
        cmp.unmatched_original,
        cmp.unmatched().len(),
        cmp.dedup.dropped
    );
    log::debug!("compare finished in {:?}", t1.elapsed());

    write_comparison_workbook(&cmp.matched, cmp.unmatched(), &ctx.output_path)?;

    let summary = SummaryBuilder::new(&ctx.output_path.display().to_string())
        .with_counts(
            cmp.matched.len(),
            cmp.unmatched_original,
            cmp.unmatched().len(),
        )
        .with_brands(collect_brands(&[&cmp.matched, cmp.unmatched()]))
        .with_reference_ids(ids.len())
        .with_timestamps(started, Utc::now())
        .build();
    Ok(ComparisonReport::new(summary, &cmp.matched, cmp.unmatched()))
}

/// Path of the stored comparison workbook, or NotFound before any run.
pub fn locate_artifact(ctx: &RunContext) -> Result<&Path, NicheError> {
    if ctx.output_path.is_file() {
        Ok(ctx.output_path.as_path())
    } else {
        Err(NicheError::NotFound(format!(
            "{} does not exist; upload a file first",
            ctx.output_path.display()
        )))
    }
}

/// Re-read the stored workbook and rebuild the run summary from it.
///
/// `unmatched_original` is recovered from the raw upload when it is still present.
pub fn load_result(ctx: &RunContext) -> Result<ComparisonReport, NicheError> {
    let started = Utc::now();
    let path = locate_artifact(ctx)?;
    let matched = ProductTable::from_sheet(read_sheet(path, Some(MATCHED_SHEET))?)?;
    let unmatched = ProductTable::from_sheet(read_sheet(path, Some(UNMATCHED_SHEET))?)?;

    let unmatched_original = match find_upload(&ctx.upload_dir) {
        Some(upload) => read_sheet(&upload, None)?
            .len()
            .saturating_sub(matched.len()),
        None => unmatched.len(),
    };

    let summary = SummaryBuilder::new(&path.display().to_string())
        .with_counts(matched.len(), unmatched_original, unmatched.len())
        .with_brands(collect_brands(&[&matched, &unmatched]))
        .with_timestamps(started, Utc::now())
        .build();
    Ok(ComparisonReport::new(summary, &matched, &unmatched))
}

/// Brand frequency report over the stored Unmatched sheet.
pub fn load_brand_report(ctx: &RunContext, top: usize) -> Result<BrandReport, NicheError> {
    let path = locate_artifact(ctx)?;
    let unmatched = read_sheet(path, Some(UNMATCHED_SHEET))?;
    brand_stats(&unmatched, top)
}

/// Copy the stored workbook to `dest`. A directory destination keeps the workbook's file name.
pub fn download_artifact(ctx: &RunContext, dest: &Path) -> Result<PathBuf, NicheError> {
    let src = locate_artifact(ctx)?;
    let target = if dest.is_dir() {
        dest.join(OUTPUT_FILE_NAME)
    } else {
        dest.to_path_buf()
    };
    if target.canonicalize().ok() == src.canonicalize().ok() && target.exists() {
        return Ok(target);
    }
    fs::copy(src, &target).map_err(|err| {
        NicheError::WriteFailure(format!("unable to copy to {}: {err}", target.display()))
    })?;
    log::info!("Copied {} to {}", src.display(), target.display());
    Ok(target)
}
