//! Liberal-profession table reader
//!
//! Local semicolon-separated file with a header line:
//!
//! ```text
//! secteur;profession;reglementation;code;enregistrement[;enregistrement_alt]
//! Santé;Infirmier;R;8690D;ADELI
//! ```

use naf_common::{NafError, Result};
use tracing::{debug, trace};

use super::{semicolon_reader, LiberalRow};

pub const SECTOR_COLUMN: usize = 0;
pub const LABEL_COLUMN: usize = 1;
pub const REGULATION_COLUMN: usize = 2;
pub const CODE_COLUMN: usize = 3;
pub const REGISTRATION_COLUMN: usize = 4;
pub const REGISTRATION_ALT_COLUMN: usize = 5;

/// Marker in the regulation column for regulated professions
pub const REGULATED_MARKER: &str = "R";

/// Parse the liberal-profession table
///
/// Records without a code column are skipped; the registration columns are
/// optional.
pub fn read_liberal_table(bytes: &[u8]) -> Result<Vec<LiberalRow>> {
    let mut reader = semicolon_reader(bytes);
    reader
        .headers()
        .map_err(|e| NafError::Csv(format!("unreadable liberal-profession header: {}", e)))?;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) if record.len() > CODE_COLUMN => record,
            Ok(_) => {
                skipped += 1;
                continue;
            },
            Err(e) => {
                trace!(line = line + 2, error = %e, "unreadable liberal record");
                skipped += 1;
                continue;
            },
        };

        let column = |index: usize| record.get(index).unwrap_or_default().trim().to_string();
        rows.push(LiberalRow {
            sector: column(SECTOR_COLUMN),
            label: column(LABEL_COLUMN),
            regulated: column(REGULATION_COLUMN) == REGULATED_MARKER,
            code: column(CODE_COLUMN),
            registration: column(REGISTRATION_COLUMN),
            registration_alt: record.get(REGISTRATION_ALT_COLUMN).map(|v| v.trim().to_string()),
        });
    }

    debug!(rows = rows.len(), skipped, "read liberal table");
    Ok(rows)
}
