//! Inputs: the product-id checklist, the uploaded listing workbook, and upload intake.

pub mod reference;
pub mod upload;
pub mod workbook;

pub use reference::{ReferenceLocation, load_reference_ids, parse_reference_csv};
pub use upload::{allowed_file, find_upload, store_upload};
pub use workbook::read_sheet;
