//! Checklist matching: split product rows by whether their title contains a known product id.

use crate::models::{ProductTable, ReferenceIds};

// Product-number extraction and first-occurrence dedup of unmatched rows
pub mod product_number;

pub use product_number::{DedupOutcome, dedup_unmatched, extract_product_number};

/// Rows split by the match mask. Both sides keep the input's columns and row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchPartition {
    pub matched: ProductTable,
    pub unmatched: ProductTable,
}

/// True when any reference id occurs verbatim inside the title.
///
/// Containment is literal and case-sensitive. An id embedded in a longer token still counts.
pub fn title_matches(ids: &ReferenceIds, title: Option<&str>) -> bool {
    match title {
        Some(t) if !t.is_empty() => ids.iter().any(|id| t.contains(id)),
        _ => false,
    }
}

pub fn match_mask(ids: &ReferenceIds, table: &ProductTable) -> Vec<bool> {
    table
        .rows
        .iter()
        .map(|r| title_matches(ids, r.title.as_deref()))
        .collect()
}

pub fn partition_by_reference(ids: &ReferenceIds, table: ProductTable) -> MatchPartition {
    let mask = match_mask(ids, &table);
    let mut matched = table.empty_like();
    let mut unmatched = table.empty_like();
    for (row, hit) in table.rows.into_iter().zip(mask) {
        if hit {
            matched.rows.push(row);
        } else {
            unmatched.rows.push(row);
        }
    }
    log::debug!(
        "partitioned {} rows against {} ids: matched={} unmatched={}",
        matched.len() + unmatched.len(),
        ids.len(),
        matched.len(),
        unmatched.len()
    );
    MatchPartition { matched, unmatched }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{CellValue, ProductTable, SheetTable};

    /// Two-column table (Product Title, Brand) from (title, brand) pairs.
    pub fn table(rows: &[(Option<&str>, Option<&str>)]) -> ProductTable {
        let sheet = SheetTable {
            headers: vec!["Product Title".into(), "Brand".into()],
            rows: rows
                .iter()
                .map(|(t, b)| {
                    vec![
                        CellValue::from(t.map(str::to_string)),
                        CellValue::from(b.map(str::to_string)),
                    ]
                })
                .collect(),
        };
        ProductTable::from_sheet(sheet).unwrap()
    }

    pub fn titles(rows: &[&str]) -> ProductTable {
        let pairs: Vec<_> = rows.iter().map(|t| (Some(*t), None)).collect();
        table(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{table, titles};
    use super::*;

    fn owned_titles(t: &ProductTable) -> Vec<String> {
        t.rows.iter().filter_map(|r| r.title.clone()).collect()
    }

    #[test]
    fn checklist_example_partition() {
        let ids = ReferenceIds::new(["ABC-123"]);
        let t = titles(&["Buy ABC-123 now", "Unrelated Widget", "XYZ-999 Pro"]);
        let p = partition_by_reference(&ids, t);
        assert_eq!(owned_titles(&p.matched), vec!["Buy ABC-123 now"]);
        assert_eq!(
            owned_titles(&p.unmatched),
            vec!["Unrelated Widget", "XYZ-999 Pro"]
        );
    }

    #[test]
    fn empty_reference_set_matches_nothing() {
        let ids = ReferenceIds::default();
        let t = titles(&["A-100", "B-200"]);
        let p = partition_by_reference(&ids, t);
        assert!(p.matched.is_empty());
        assert_eq!(p.unmatched.len(), 2);
    }

    #[test]
    fn missing_title_never_matches() {
        let ids = ReferenceIds::new(["nan", "X"]);
        let t = table(&[(None, Some("Acme")), (Some("X marks"), None)]);
        assert_eq!(match_mask(&ids, &t), vec![false, true]);
    }

    #[test]
    fn containment_is_case_sensitive_and_literal() {
        let ids = ReferenceIds::new(["abc-1", "A.C"]);
        assert!(!title_matches(&ids, Some("ABC-1 dryer")));
        assert!(!title_matches(&ids, Some("ABC dryer")));
        assert!(title_matches(&ids, Some("fits A.C units")));
    }

    #[test]
    fn embedded_id_counts_as_match() {
        let ids = ReferenceIds::new(["500"]);
        assert!(title_matches(&ids, Some("Model XR-5000")));
    }

    #[test]
    fn partition_is_exact_and_ordered() {
        let ids = ReferenceIds::new(["K1", "K2"]);
        let t = titles(&["a K1", "b", "c K2", "d", "K1K2 e"]);
        let input = t.clone();
        let p = partition_by_reference(&ids, t);
        assert_eq!(p.matched.len() + p.unmatched.len(), input.len());

        let mut positions: Vec<usize> = p
            .matched
            .rows
            .iter()
            .chain(p.unmatched.rows.iter())
            .map(|r| r.position)
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..input.len()).collect::<Vec<_>>());

        for r in &p.matched.rows {
            assert!(title_matches(&ids, r.title.as_deref()));
        }
        for r in &p.unmatched.rows {
            assert!(!title_matches(&ids, r.title.as_deref()));
        }
        assert!(p.matched.rows.windows(2).all(|w| w[0].position < w[1].position));
        assert!(p.unmatched.rows.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn matched_rows_are_not_mutated() {
        let ids = ReferenceIds::new(["Z9"]);
        let t = table(&[(Some("Z9 toaster"), Some("Brandy"))]);
        let original = t.rows[0].clone();
        let p = partition_by_reference(&ids, t);
        assert_eq!(p.matched.rows[0], original);
        assert_eq!(p.matched.columns, vec!["Product Title", "Brand"]);
    }
}
