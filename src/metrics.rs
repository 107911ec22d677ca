use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

/// One-time metric registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_gauge!("dataset_records_loaded", "Listings in the startup index.");
        describe_counter!("lookup_requests_total", "Lookup requests received.");
        describe_counter!("lookup_hits_total", "Lookups that found a listing.");
        describe_counter!(
            "lookup_not_found_total",
            "Lookups for an unknown listing_id."
        );
        describe_counter!(
            "lookup_seller_mismatch_total",
            "Lookups rejected on seller_id mismatch."
        );
        describe_counter!(
            "lookup_empty_input_total",
            "Lookups submitted without a listing_id."
        );
    });
}

impl Metrics {
    /// Initialize the Prometheus recorder and expose the record-count gauge.
    pub fn init(records_loaded: usize) -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        ensure_metrics_described();
        gauge!("dataset_records_loaded").set(records_loaded as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
