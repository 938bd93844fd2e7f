//! NAFA table reader
//!
//! The open-data export is semicolon separated with a header line. The code
//! and its label share one cell, e.g. `10.13A Préparation industrielle de
//! produits à base de viande`: the first 6 bytes are the code, the label
//! starts after the separating space.

use naf_common::{NafError, Result};
use tracing::{debug, trace};

use super::{semicolon_reader, CodeRow};

/// Column holding `code label`
pub const NAFA_CODE_COLUMN: usize = 1;

/// Rows with fewer columns are skipped
const MIN_COLUMNS: usize = 3;

/// Width of the code at the start of the cell
const CODE_WIDTH: usize = 6;

/// Shortest cell holding a code, a separator and a label
const MIN_CELL_LEN: usize = 8;

/// Split `"01.11Z Culture"` into a code and a label
pub fn split_code_cell(cell: &str) -> Option<CodeRow> {
    if cell.len() < MIN_CELL_LEN {
        return None;
    }

    let code = cell.get(..CODE_WIDTH)?;
    let name = cell.get(CODE_WIDTH + 1..)?;
    Some(CodeRow::new(code, name.trim()))
}

/// Parse the NAFA table
///
/// Unreadable records, short records and cells too short to hold a code are
/// skipped.
pub fn read_nafa_table(bytes: &[u8]) -> Result<Vec<CodeRow>> {
    let mut reader = semicolon_reader(bytes);
    reader
        .headers()
        .map_err(|e| NafError::Csv(format!("unreadable NAFA header: {}", e)))?;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                trace!(line = line + 2, error = %e, "unreadable NAFA record");
                skipped += 1;
                continue;
            },
        };

        let row = (record.len() >= MIN_COLUMNS)
            .then(|| record.get(NAFA_CODE_COLUMN))
            .flatten()
            .and_then(split_code_cell);

        match row {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    debug!(rows = rows.len(), skipped, "read NAFA table");
    Ok(rows)
}
