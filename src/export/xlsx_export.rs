use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::error::NicheError;
use crate::models::{CellValue, ProductTable};

pub const MATCHED_SHEET: &str = "Matched";
pub const UNMATCHED_SHEET: &str = "Unmatched";

fn ensure_parent_dir(path: &Path) -> Result<(), NicheError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|err| {
                NicheError::WriteFailure(format!("unable to create {}: {err}", parent.display()))
            })?;
        }
    }
    Ok(())
}

fn header_format() -> Format {
    Format::new().set_bold().set_align(FormatAlign::Center)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn write_table_sheet(ws: &mut Worksheet, table: &ProductTable) -> Result<(), XlsxError> {
    let hfmt = header_format();
    for (c, h) in table.columns.iter().enumerate() {
        ws.write_string_with_format(0, c as u16, h, &hfmt)?;
    }
    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (c, cell) in row.fields.iter().enumerate() {
            let col = c as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    ws.write_string(r, col, s)?;
                }
                CellValue::Number(n) => {
                    ws.write_number(r, col, *n)?;
                }
                CellValue::Int(n) => {
                    ws.write_number(r, col, *n as f64)?;
                }
                CellValue::Bool(b) => {
                    ws.write_boolean(r, col, *b)?;
                }
            }
        }
    }
    Ok(())
}

fn build_workbook(matched: &ProductTable, unmatched: &ProductTable) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    {
        let ws = workbook.add_worksheet();
        ws.set_name(MATCHED_SHEET)?;
        write_table_sheet(ws, matched)?;
    }
    {
        let ws = workbook.add_worksheet();
        ws.set_name(UNMATCHED_SHEET)?;
        write_table_sheet(ws, unmatched)?;
    }
    Ok(workbook)
}

/// Write the Matched and Unmatched sheets to `path`, replacing any previous workbook.
///
/// The workbook is saved next to `path` first and renamed over it, so a failed write leaves
/// the previous artifact intact.
pub fn write_comparison_workbook(
    matched: &ProductTable,
    unmatched: &ProductTable,
    path: &Path,
) -> Result<(), NicheError> {
    ensure_parent_dir(path)?;
    let tmp = partial_path(path);
    let saved = build_workbook(matched, unmatched).and_then(|mut wb| wb.save(&tmp));
    if let Err(err) = saved {
        let _ = fs::remove_file(&tmp);
        return Err(NicheError::WriteFailure(format!(
            "unable to write {}: {err}",
            path.display()
        )));
    }
    fs::rename(&tmp, path).map_err(|err| {
        let _ = fs::remove_file(&tmp);
        NicheError::WriteFailure(format!("unable to replace {}: {err}", path.display()))
    })?;
    log::info!(
        "Wrote {} ({} matched, {} unmatched)",
        path.display(),
        matched.len(),
        unmatched.len()
    );
    Ok(())
}
