use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::models::{CellValue, PRODUCT_NUMBER_COLUMN, ProductTable};

/// Uppercase/digit/hyphen token of length >= 3 between word boundaries.
const PRODUCT_NUMBER_PATTERN: &str = r"\b([A-Z0-9-]{3,})\b";

fn product_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PRODUCT_NUMBER_PATTERN).expect("product number pattern compiles"))
}

/// First product-number-looking token in the title, matched against the original casing.
pub fn extract_product_number(title: Option<&str>) -> Option<String> {
    let title = title.filter(|t| !t.is_empty())?;
    product_number_regex()
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    /// Surviving coded rows (first per code) followed by every uncoded row.
    pub unmatched: ProductTable,
    pub with_code: usize,
    pub without_code: usize,
    pub dropped: usize,
}

/// Tag each unmatched row with its product number and keep only the first row per number.
///
/// The number is stored in a `product_number` column, replacing one that already exists.
/// Rows without a number are never dropped.
pub fn dedup_unmatched(unmatched: ProductTable) -> DedupOutcome {
    let ProductTable { mut columns, rows } = unmatched;
    let code_idx = match columns.iter().position(|c| c == PRODUCT_NUMBER_COLUMN) {
        Some(i) => i,
        None => {
            columns.push(PRODUCT_NUMBER_COLUMN.to_string());
            columns.len() - 1
        }
    };
    let width = columns.len();

    let mut seen: HashSet<String> = HashSet::new();
    let mut has_code = Vec::new();
    let mut no_code = Vec::new();
    let mut with_code = 0usize;

    for mut row in rows {
        let code = extract_product_number(row.title.as_deref());
        row.fields.resize(width, CellValue::Empty);
        row.fields[code_idx] = CellValue::from(code.clone());
        match code {
            Some(code) => {
                with_code += 1;
                if seen.insert(code) {
                    has_code.push(row);
                }
            }
            None => no_code.push(row),
        }
    }

    let dropped = with_code - has_code.len();
    let without_code = no_code.len();
    has_code.extend(no_code);
    log::debug!(
        "dedup: with_code={} without_code={} dropped={}",
        with_code,
        without_code,
        dropped
    );
    DedupOutcome {
        unmatched: ProductTable {
            columns,
            rows: has_code,
        },
        with_code,
        without_code,
        dropped,
    }
}
