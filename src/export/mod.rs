pub mod xlsx_export;

pub use xlsx_export::{MATCHED_SHEET, UNMATCHED_SHEET, write_comparison_workbook};
