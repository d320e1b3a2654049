use calamine::{DataType, Reader, open_workbook_auto};
use std::path::Path;

use crate::error::NicheError;
use crate::models::{CellValue, SheetTable};

/// Read one sheet of an xlsx/xls workbook. `sheet = None` reads the first sheet.
///
/// The first row supplies column names; fully blank data rows are skipped.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<SheetTable, NicheError> {
    let mut workbook = open_workbook_auto(path).map_err(|err| {
        NicheError::ReadFailure(format!(
            "unable to open workbook {}: {err}",
            path.display()
        ))
    })?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook.sheet_names().first().cloned().ok_or_else(|| {
            NicheError::ReadFailure(format!("{} contains no worksheets", path.display()))
        })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| {
            NicheError::ReadFailure(format!(
                "worksheet '{sheet_name}' not found in {}",
                path.display()
            ))
        })?
        .map_err(|err| {
            NicheError::ReadFailure(format!("unable to read worksheet '{sheet_name}': {err}"))
        })?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Ok(SheetTable::default());
    };
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, c)| header_name(i, c))
        .collect();

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut values: Vec<CellValue> = row.iter().map(cell_value).collect();
        if values.iter().all(CellValue::is_empty) {
            continue;
        }
        values.resize(headers.len(), CellValue::Empty);
        rows.push(values);
    }
    log::debug!(
        "read {} rows x {} columns from {}:{}",
        rows.len(),
        headers.len(),
        path.display(),
        sheet_name
    );
    Ok(SheetTable { headers, rows })
}

fn header_name(idx: usize, cell: &DataType) -> String {
    let name = match cell {
        DataType::Empty => String::new(),
        _ => cell.to_string().trim().to_string(),
    };
    if name.is_empty() {
        format!("Unnamed: {idx}")
    } else {
        name
    }
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty | DataType::Error(_) => CellValue::Empty,
        DataType::String(s) if s.is_empty() => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Int(i) => CellValue::Int(*i),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}
