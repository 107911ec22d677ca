// src/dataset/mod.rs
//! Dataset loading: resolve a source, fetch it, parse it, index it.
//!
//! Runs exactly once at startup. Any failure here is fatal — the service cannot
//! answer lookups without a dataset, so there is no partial-startup state.

pub mod record;
pub mod structured;
pub mod tabular;
pub mod value;

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use metrics::gauge;

use crate::config::{DataSource, DatasetConfig};
pub use crate::dataset::record::ListingRecord;

/// A parsed record before typing: normalized field name → raw value.
/// Both format families produce this shape.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// The two format families a deployment can point us at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl FromStr for DatasetFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" | "jsonl" | "ndjson" => Ok(Self::Json),
            other => Err(anyhow!("unknown DATA_FORMAT '{other}' (expected csv or json)")),
        }
    }
}

/// Pick a format: explicit override, then origin extension, then a sniff of the
/// first non-whitespace byte.
pub fn detect_format(hint: Option<DatasetFormat>, origin: &str, text: &str) -> DatasetFormat {
    if let Some(f) = hint {
        return f;
    }
    // strip any query string before looking at the extension
    let path = origin.split('?').next().unwrap_or(origin);
    let ext = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "json" | "jsonl" | "ndjson" => return DatasetFormat::Json,
        "csv" | "tsv" | "txt" => return DatasetFormat::Csv,
        _ => {}
    }
    match text.trim_start().as_bytes().first() {
        Some(b'{') | Some(b'[') => DatasetFormat::Json,
        _ => DatasetFormat::Csv,
    }
}

/// Immutable lookup index, keyed by `listing_id`. Built once, shared via `Arc`,
/// never written after startup.
#[derive(Debug, Clone)]
pub struct ListingIndex {
    by_id: HashMap<String, ListingRecord>,
    /// Ids in first-seen row order, for diagnostics sampling.
    order: Vec<String>,
}

impl ListingIndex {
    /// Build the index. Fatal errors: zero parsed records, `listing_id` absent
    /// from every record, or zero usable rows after cleaning.
    ///
    /// Duplicate ids keep the last row seen, matching the upstream export's
    /// own semantics, but each overwrite is logged so data loss is visible.
    pub fn from_records(records: Vec<RawRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("dataset parsed to 0 records");
        }
        if !records.iter().any(|r| r.contains_key("listing_id")) {
            let mut columns: Vec<&str> =
                records.iter().flat_map(|r| r.keys().map(String::as_str)).collect();
            columns.sort_unstable();
            columns.dedup();
            bail!(
                "dataset missing required column 'listing_id'. Columns: {:?}",
                columns
            );
        }

        let mut by_id = HashMap::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());
        for raw in records {
            let Some(rec) = ListingRecord::from_raw(raw) else {
                continue;
            };
            let id = rec.listing_id.clone();
            if let Some(prev) = by_id.insert(id.clone(), rec) {
                tracing::warn!(
                    listing_id = %prev.listing_id,
                    "duplicate listing_id, keeping the later row"
                );
            } else {
                order.push(id);
            }
        }

        if by_id.is_empty() {
            bail!("dataset has 0 rows with a valid listing_id");
        }
        Ok(Self { by_id, order })
    }

    pub fn get(&self, listing_id: &str) -> Option<&ListingRecord> {
        self.by_id.get(listing_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Up to `n` listing ids in first-seen row order, for the health
    /// endpoint's sanity check that ids kept their exact string form.
    pub fn sample_ids(&self, n: usize) -> Vec<&str> {
        self.order.iter().take(n).map(String::as_str).collect()
    }
}

/// Startup product: the index plus a human-readable descriptor of where the
/// data came from (`data_url`, `blob_url+sas_token`, or `local_file`).
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub index: ListingIndex,
    pub source: String,
}

/// Parse text in the given format into raw records.
pub fn parse_records(text: &str, format: DatasetFormat) -> Result<Vec<RawRecord>> {
    match format {
        DatasetFormat::Csv => tabular::parse(text),
        DatasetFormat::Json => Ok(structured::parse(text)),
    }
}

/// Load the dataset per the resolved configuration. Called once at startup;
/// every error path aborts the boot.
pub async fn load(cfg: &DatasetConfig) -> Result<LoadedDataset> {
    let source = cfg.resolve()?;

    let (text, origin, descriptor) = match &source {
        DataSource::Url { url, source } => {
            let text = download_text(url, cfg).await?;
            (text, url.clone(), *source)
        }
        DataSource::LocalFile(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading local dataset {}", path.display()))?;
            (text, path.display().to_string(), "local_file")
        }
    };

    let format = detect_format(cfg.format, &origin, &text);
    let records = parse_records(&text, format)
        .with_context(|| format!("parsing dataset from {descriptor}"))?;
    let index = ListingIndex::from_records(records)
        .with_context(|| format!("indexing dataset from {descriptor}"))?;

    gauge!("dataset_records_loaded").set(index.len() as f64);
    tracing::info!(
        records = index.len(),
        source = descriptor,
        format = ?format,
        "dataset loaded"
    );

    Ok(LoadedDataset {
        index,
        source: descriptor.to_string(),
    })
}

/// GET the dataset with a bounded timeout, failing on any non-success status.
/// The body is decoded by forcing UTF-8 rather than trusting the declared
/// charset — blob stores routinely mislabel exports and mangle accents.
async fn download_text(url: &str, cfg: &DatasetConfig) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(cfg.http_timeout)
        .build()
        .context("building http client")?;

    let resp = client
        .get(url)
        .send()
        .await
        .context("fetching dataset url")?
        .error_for_status()
        .context("dataset url returned an error status")?;

    let bytes = resp.bytes().await.context("reading dataset body")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
