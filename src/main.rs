//! Listing Insight — Binary Entrypoint
//! Loads the listing dataset once, then boots the Axum HTTP server with the
//! immutable index wired into shared state.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use listing_insight::metrics::Metrics;
use listing_insight::{api, dataset, DatasetConfig};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - INSIGHT_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("INSIGHT_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("listing_insight=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This enables
    // DATA_URL / BLOB_URL / SAS_TOKEN from .env for local testing.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    // --- Load the dataset, or refuse to start ---
    // The error message enumerates every configuration option.
    let cfg = DatasetConfig::from_env();
    let dataset = dataset::load(&cfg).await.expect("failed to load listing dataset");

    let metrics = Metrics::init(dataset.index.len());

    let state = api::AppState::new(dataset);
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
