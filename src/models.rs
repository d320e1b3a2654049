use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::NicheError;

pub const PRODUCT_TITLE_COLUMN: &str = "Product Title";
pub const BRAND_COLUMN: &str = "Brand";
pub const PRODUCT_NUMBER_COLUMN: &str = "product_number";

/// A single spreadsheet cell, kept as close to its source type as the writer allows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text form of the cell; `None` for empty cells and empty strings.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Number(n) => Some(n.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<Option<String>> for CellValue {
    fn from(v: Option<String>) -> Self {
        match v {
            Some(s) if !s.is_empty() => Self::Text(s),
            _ => Self::Empty,
        }
    }
}

/// Untyped sheet as read from a workbook: header row plus data rows aligned to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One product listing. `title` and `brand` are typed views over `fields`, which keeps every
/// source cell in column order so the row can be written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub position: usize,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub fields: Vec<CellValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductTable {
    pub columns: Vec<String>,
    pub rows: Vec<ProductRow>,
}

impl ProductTable {
    /// Type a raw sheet. Requires the "Product Title" column; "Brand" is optional.
    pub fn from_sheet(sheet: SheetTable) -> Result<Self, NicheError> {
        let title_idx = sheet.column_index(PRODUCT_TITLE_COLUMN).ok_or_else(|| {
            NicheError::ComputeFailure(format!("missing expected column '{PRODUCT_TITLE_COLUMN}'"))
        })?;
        let brand_idx = sheet.column_index(BRAND_COLUMN);
        let width = sheet.headers.len();
        let rows = sheet
            .rows
            .into_iter()
            .enumerate()
            .map(|(position, mut fields)| {
                fields.resize(width, CellValue::Empty);
                ProductRow {
                    position,
                    title: fields[title_idx].as_text(),
                    brand: brand_idx.and_then(|i| fields[i].as_text()),
                    fields,
                }
            })
            .collect();
        Ok(Self {
            columns: sheet.headers,
            rows,
        })
    }

    /// Empty table sharing this table's columns.
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn titles(&self) -> Vec<Option<&str>> {
        self.rows.iter().map(|r| r.title.as_deref()).collect()
    }

    /// Distinct non-empty brands in this table.
    pub fn brands(&self) -> HashSet<String> {
        self.rows.iter().filter_map(|r| r.brand.clone()).collect()
    }

    /// Rows as column-name keyed JSON objects, in column order.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row.fields.iter())
                    .map(|(c, v)| {
                        (
                            c.clone(),
                            serde_json::to_value(v).unwrap_or(Value::Null),
                        )
                    })
                    .collect()
            })
            .collect()
    }
}

/// Known product ids in first-seen order, without duplicates or empty entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIds {
    ids: Vec<String>,
}

impl ReferenceIds {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for v in values {
            let v: String = v.into();
            if v.is_empty() {
                continue;
            }
            if seen.insert(v.clone()) {
                ids.push(v);
            }
        }
        Self { ids }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    #[test]
    fn cell_text_coercion() {
        assert_eq!(CellValue::Empty.as_text(), None);
        assert_eq!(text("").as_text(), None);
        assert_eq!(text("Dryer").as_text().as_deref(), Some("Dryer"));
        assert_eq!(CellValue::Int(42).as_text().as_deref(), Some("42"));
        assert_eq!(CellValue::Number(123.0).as_text().as_deref(), Some("123"));
        assert_eq!(CellValue::Number(1.5).as_text().as_deref(), Some("1.5"));
    }

    #[test]
    fn from_sheet_types_title_and_brand() {
        let sheet = SheetTable {
            headers: vec!["Brand".into(), "Product Title".into(), "Price".into()],
            rows: vec![
                vec![text("Acme"), text("Dryer XR-500"), CellValue::Number(19.9)],
                vec![CellValue::Empty, CellValue::Empty],
            ],
        };
        let t = ProductTable::from_sheet(sheet).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0].title.as_deref(), Some("Dryer XR-500"));
        assert_eq!(t.rows[0].brand.as_deref(), Some("Acme"));
        assert_eq!(t.rows[1].title, None);
        assert_eq!(t.rows[1].position, 1);
        // short rows are padded to the header width
        assert_eq!(t.rows[1].fields.len(), 3);
    }

    #[test]
    fn from_sheet_requires_title_column() {
        let sheet = SheetTable {
            headers: vec!["Brand".into()],
            rows: vec![vec![text("Acme")]],
        };
        let err = ProductTable::from_sheet(sheet).unwrap_err();
        assert!(matches!(err, NicheError::ComputeFailure(_)));
    }

    #[test]
    fn reference_ids_dedup_in_order() {
        let ids = ReferenceIds::new(["B-2", "A-1", "", "B-2", "a-1"]);
        assert_eq!(ids.iter().collect::<Vec<_>>(), vec!["B-2", "A-1", "a-1"]);
    }

    #[test]
    fn records_use_column_names() {
        let sheet = SheetTable {
            headers: vec!["Product Title".into(), "Rank".into()],
            rows: vec![vec![text("Widget"), CellValue::Int(3)]],
        };
        let t = ProductTable::from_sheet(sheet).unwrap();
        let recs = t.to_records();
        assert_eq!(recs[0]["Product Title"], Value::from("Widget"));
        assert_eq!(recs[0]["Rank"], Value::from(3));
    }
}
