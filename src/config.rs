// src/config.rs
//! Dataset source configuration, read once from the environment at startup.
//!
//! Resolution order (first non-empty wins):
//! 1. `DATA_URL` — a full URL, public or with an embedded SAS token.
//! 2. `BLOB_URL` + `SAS_TOKEN` — joined here.
//! 3. `LOCAL_DATA_FILE` (default `data_sample.csv`) for local testing.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::dataset::DatasetFormat;

pub const ENV_DATA_URL: &str = "DATA_URL";
pub const ENV_BLOB_URL: &str = "BLOB_URL";
pub const ENV_SAS_TOKEN: &str = "SAS_TOKEN";
pub const ENV_LOCAL_DATA_FILE: &str = "LOCAL_DATA_FILE";
pub const ENV_DATA_FORMAT: &str = "DATA_FORMAT";

pub const DEFAULT_LOCAL_DATA_FILE: &str = "data_sample.csv";

/// Generous timeout: blob storage can be slow to first byte.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub data_url: String,
    pub blob_url: String,
    pub sas_token: String,
    pub local_file: PathBuf,
    pub format: Option<DatasetFormat>,
    pub http_timeout: Duration,
}

/// Where the dataset will actually be read from, with the descriptor string
/// surfaced later on `/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url { url: String, source: &'static str },
    LocalFile(PathBuf),
}

impl DatasetConfig {
    pub fn from_env() -> Self {
        let format = std::env::var(ENV_DATA_FORMAT)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| match s.parse::<DatasetFormat>() {
                Ok(f) => Some(f),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring invalid DATA_FORMAT");
                    None
                }
            });

        Self {
            data_url: env_trimmed(ENV_DATA_URL),
            blob_url: env_trimmed(ENV_BLOB_URL),
            sas_token: env_trimmed(ENV_SAS_TOKEN),
            local_file: std::env::var(ENV_LOCAL_DATA_FILE)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_DATA_FILE)),
            format,
            http_timeout: HTTP_TIMEOUT,
        }
    }

    /// Resolve the configured source, or fail with a message naming every
    /// configuration option — this is the operator's first contact with the
    /// service, so the error has to be self-explanatory.
    pub fn resolve(&self) -> Result<DataSource> {
        if !self.data_url.is_empty() {
            return Ok(DataSource::Url {
                url: self.data_url.clone(),
                source: "data_url",
            });
        }

        let joined = join_blob_and_token(&self.blob_url, &self.sas_token);
        if !joined.is_empty() {
            return Ok(DataSource::Url {
                url: joined,
                source: "blob_url+sas_token",
            });
        }

        if self.local_file.exists() {
            return Ok(DataSource::LocalFile(self.local_file.clone()));
        }

        Err(anyhow!(
            "Missing data source.\n\
             - Set env var {ENV_DATA_URL} to a full URL, OR\n\
             - Set env vars {ENV_BLOB_URL} and {ENV_SAS_TOKEN}, OR\n\
             - Put {} next to the binary for local testing.",
            self.local_file.display()
        ))
    }
}

fn env_trimmed(name: &str) -> String {
    std::env::var(name).unwrap_or_default().trim().to_string()
}

/// Build `blob_url + "?" + sas_token`, handling a token with or without a
/// leading `?` and a blob url with or without an existing query string.
pub fn join_blob_and_token(blob_url: &str, sas_token: &str) -> String {
    let blob_url = blob_url.trim();
    let sas_token = sas_token.trim();

    if blob_url.is_empty() {
        return String::new();
    }
    if sas_token.is_empty() {
        return blob_url.to_string();
    }

    let token = sas_token.strip_prefix('?').unwrap_or(sas_token);

    if blob_url.contains('?') {
        if blob_url.ends_with('?') || blob_url.ends_with('&') {
            return format!("{blob_url}{token}");
        }
        return format!("{blob_url}&{token}");
    }
    format!("{blob_url}?{token}")
}
