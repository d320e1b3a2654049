//! Run summary reporting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::ProductTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub matched_count: usize,
    pub unmatched_original: usize,
    pub unmatched_final: usize,
    pub output_file: String,
    pub brands: Vec<String>,
    pub reference_ids: Option<usize>,
    pub started_utc: DateTime<Utc>,
    pub ended_utc: DateTime<Utc>,
    pub duration_secs: f64,
}

impl RunSummary {
    /// One-line status in the form "Matched: X, Unmatched: Y → Z".
    pub fn headline(&self) -> String {
        format!(
            "Matched: {}, Unmatched: {} → {}",
            self.matched_count, self.unmatched_original, self.unmatched_final
        )
    }
}

/// Sorted distinct brands across the given tables.
pub fn collect_brands(tables: &[&ProductTable]) -> Vec<String> {
    let set: BTreeSet<String> = tables.iter().flat_map(|t| t.brands()).collect();
    set.into_iter().collect()
}

/// Builder for RunSummary.
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    matched_count: usize,
    unmatched_original: usize,
    unmatched_final: usize,
    output_file: String,
    brands: Vec<String>,
    reference_ids: Option<usize>,
    started_utc: DateTime<Utc>,
    ended_utc: DateTime<Utc>,
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            matched_count: 0,
            unmatched_original: 0,
            unmatched_final: 0,
            output_file: String::new(),
            brands: Vec::new(),
            reference_ids: None,
            started_utc: now,
            ended_utc: now,
        }
    }
}

impl SummaryBuilder {
    pub fn new(output_file: &str) -> Self {
        Self {
            output_file: output_file.to_string(),
            ..Default::default()
        }
    }

    pub fn with_counts(mut self, matched: usize, unmatched_original: usize, unmatched_final: usize) -> Self {
        self.matched_count = matched;
        self.unmatched_original = unmatched_original;
        self.unmatched_final = unmatched_final;
        self
    }

    pub fn with_brands(mut self, brands: Vec<String>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_reference_ids(mut self, n: usize) -> Self {
        self.reference_ids = Some(n);
        self
    }

    pub fn with_timestamps(mut self, started: DateTime<Utc>, ended: DateTime<Utc>) -> Self {
        self.started_utc = started;
        self.ended_utc = ended;
        self
    }

    pub fn build(self) -> RunSummary {
        let duration_secs = (self.ended_utc - self.started_utc).num_milliseconds() as f64 / 1000.0;
        RunSummary {
            matched_count: self.matched_count,
            unmatched_original: self.unmatched_original,
            unmatched_final: self.unmatched_final,
            output_file: self.output_file,
            brands: self.brands,
            reference_ids: self.reference_ids,
            started_utc: self.started_utc,
            ended_utc: self.ended_utc,
            duration_secs,
        }
    }
}
