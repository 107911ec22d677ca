// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod dataset;
pub mod feedback;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::DatasetConfig;
pub use crate::dataset::{ListingIndex, ListingRecord, LoadedDataset};
