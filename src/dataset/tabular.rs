//! Tabular (delimited-text) parsing.
//!
//! Every cell is read as a raw string. The `csv` reader never infers numerics,
//! which is the whole point: a 17-digit `listing_id` must survive as the exact
//! same string, not collapse into scientific notation the way dtype-inferring
//! readers mangle it.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::dataset::value::is_null_token;
use crate::dataset::RawRecord;

/// Normalize a header: trim, lowercase, spaces to underscores.
pub fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace(' ', "_")
}

/// Parse CSV text into raw records keyed by normalized headers.
///
/// Null-token cells (`""`, `"nan"`, `"none"`, `"null"`) become JSON null so the
/// column still counts as present. Ragged rows are tolerated; rows the reader
/// cannot decode are skipped with a warning.
pub fn parse(text: &str) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .context("reading csv header row")?
        .iter()
        .map(normalize_header)
        .collect();

    let mut out = Vec::new();
    for (line, row) in rdr.records().enumerate() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, line, "skipping unreadable csv row");
                continue;
            }
        };

        let mut rec = RawRecord::new();
        for (i, cell) in row.iter().enumerate() {
            let Some(header) = headers.get(i) else {
                continue;
            };
            if header.is_empty() {
                continue;
            }
            let value = if is_null_token(cell.trim()) {
                Value::Null
            } else {
                Value::String(cell.to_string())
            };
            rec.insert(header.clone(), value);
        }
        out.push(rec);
    }

    Ok(out)
}
