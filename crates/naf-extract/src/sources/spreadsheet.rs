//! INSEE NAF workbook reader
//!
//! The first worksheet lists every level of the nomenclature in order:
//!
//! ```text
//! | # | Code      | Intitulé                              |
//! | 1 | SECTION A | Agriculture, sylviculture et pêche    |
//! | 2 | 01        | Culture et production animale, ...    |
//! | 3 | 01.1      | Cultures non permanentes              |
//! | 4 | 01.11Z    | Culture de céréales (à l'exception ...|
//! ```

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use naf_common::{NafError, Result};
use std::io::Cursor;
use tracing::debug;

use super::CodeRow;

/// Sheet column holding the code (0 = column A)
pub const NAF_CODE_COLUMN: u32 = 1;

/// Sheet column holding the label
pub const NAF_NAME_COLUMN: u32 = 2;

/// Text of the cell at an absolute sheet position
///
/// `Range` trims empty leading rows and columns, so positions are absolute
/// rather than relative to the first used cell.
fn cell_text(range: &Range<Data>, row: u32, column: u32) -> String {
    match range.get_value((row, column)) {
        Some(Data::String(value)) => value.clone(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Turn the used rows of a worksheet into `(code, name)` pairs
///
/// Every row is kept; short or empty rows yield empty codes, which the builder
/// skips.
pub fn rows_from_range(range: &Range<Data>) -> Vec<CodeRow> {
    let (Some((first, _)), Some((last, _))) = (range.start(), range.end()) else {
        return Vec::new();
    };

    (first..=last)
        .map(|row| {
            CodeRow::new(
                cell_text(range, row, NAF_CODE_COLUMN),
                cell_text(range, row, NAF_NAME_COLUMN),
            )
        })
        .collect()
}

/// Decode the workbook and read its first worksheet
///
/// The container format (`.xls`, `.xlsx`, `.ods`) is detected from the bytes.
pub fn read_naf_workbook(bytes: Vec<u8>) -> Result<Vec<CodeRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| NafError::Spreadsheet(format!("cannot open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| NafError::Spreadsheet("no sheet found in workbook".to_string()))?
        .map_err(|e| NafError::Spreadsheet(format!("cannot read first sheet: {}", e)))?;

    let rows = rows_from_range(&range);
    debug!(rows = rows.len(), "read NAF worksheet");
    Ok(rows)
}
