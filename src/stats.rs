//! Brand frequency report over a results sheet.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::NicheError;
use crate::models::{BRAND_COLUMN, SheetTable};

pub const DEFAULT_TOP_BRANDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandStat {
    pub brand: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandReport {
    pub total_unmatched: usize,
    pub brand_stats: Vec<BrandStat>,
    pub top_brands: Vec<BrandStat>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Count rows per brand, most frequent first (ties by brand name).
///
/// Rows without a brand are left out of the groups but still count toward the total, so the
/// percentages need not sum to 100.
pub fn brand_stats(table: &SheetTable, top: usize) -> Result<BrandReport, NicheError> {
    let idx = table.column_index(BRAND_COLUMN).ok_or_else(|| {
        NicheError::ComputeFailure(format!("missing expected column '{BRAND_COLUMN}'"))
    })?;
    let total = table.len();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in &table.rows {
        if let Some(brand) = row.get(idx).and_then(|c| c.as_text()) {
            *counts.entry(brand).or_insert(0) += 1;
        }
    }

    let mut stats: Vec<BrandStat> = counts
        .into_iter()
        .map(|(brand, count)| BrandStat {
            brand,
            count,
            percentage: round2(count as f64 / total as f64 * 100.0),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.brand.cmp(&b.brand)));

    let top_brands = stats.iter().take(top).cloned().collect();
    Ok(BrandReport {
        total_unmatched: total,
        brand_stats: stats,
        top_brands,
    })
}
