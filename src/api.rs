// src/api.rs
//! HTTP surface: the lookup endpoint and the health check.
//!
//! The state is built once at startup from the loaded dataset and only ever
//! read here — handlers take `Arc`-shared references and never lock.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::dataset::{ListingIndex, LoadedDataset};
use crate::feedback::{
    build_suggestions, centrality_explain, description_explain, high_rated_banner, Banner,
    ScoreExplanation, SuggestionBlock,
};

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<ListingIndex>,
    pub data_source: Arc<String>,
}

impl AppState {
    pub fn new(dataset: LoadedDataset) -> Self {
        Self {
            index: Arc::new(dataset.index),
            data_source: Arc::new(dataset.source),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn home() -> &'static str {
    "listing-insight: POST /analyze (listing_id, seller_id), GET /health"
}

#[derive(Debug, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub listing_id: String,
    #[serde(default)]
    pub seller_id: String,
}

/// Everything the UI renders for one listing.
#[derive(Debug, Serialize)]
pub struct ListingReport {
    pub listing_id: String,
    pub seller_id: String,
    pub country: String,
    pub banner: Banner,
    pub description: ScoreExplanation,
    pub centrality: ScoreExplanation,
    pub suggestions: Vec<SuggestionBlock>,
}

/// Exactly one of `result` / `error` is set.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub result: Option<ListingReport>,
    pub error: Option<String>,
}

impl LookupResponse {
    fn error(msg: String) -> Self {
        Self {
            result: None,
            error: Some(msg),
        }
    }
}

async fn analyze(
    State(state): State<AppState>,
    Form(form): Form<LookupForm>,
) -> Json<LookupResponse> {
    counter!("lookup_requests_total").increment(1);

    let listing_id = form.listing_id.trim();
    let seller_id = form.seller_id.trim();

    if listing_id.is_empty() {
        counter!("lookup_empty_input_total").increment(1);
        return Json(LookupResponse::error("Please enter a Listing ID.".to_string()));
    }

    let Some(rec) = state.index.get(listing_id) else {
        counter!("lookup_not_found_total").increment(1);
        return Json(LookupResponse::error(format!(
            "Listing ID '{listing_id}' was not found in the sample data."
        )));
    };

    let expected_seller = rec.seller_id.as_deref().unwrap_or("");
    if !seller_id.is_empty() && !expected_seller.is_empty() && seller_id != expected_seller {
        counter!("lookup_seller_mismatch_total").increment(1);
        // Deliberately reveals the expected id; the original tool did the same.
        return Json(LookupResponse::error(format!(
            "Seller ID does not match this listing. Expected Seller ID: {expected_seller}"
        )));
    }

    counter!("lookup_hits_total").increment(1);
    let report = ListingReport {
        listing_id: rec.listing_id.clone(),
        seller_id: expected_seller.to_string(),
        country: rec.country.clone().unwrap_or_default(),
        banner: high_rated_banner(rec.country.as_deref(), rec.high_rated),
        description: description_explain(rec.description_score),
        centrality: centrality_explain(rec.centrality_score_sel),
        suggestions: build_suggestions(rec),
    };

    Json(LookupResponse {
        result: Some(report),
        error: None,
    })
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    records_loaded: usize,
    data_source: String,
    /// Sanity check that ids kept their exact string form (no scientific
    /// notation creeping in from a numeric round-trip).
    sample_listing_ids: Vec<String>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records_loaded: state.index.len(),
        data_source: state.data_source.as_ref().clone(),
        sample_listing_ids: state
            .index
            .sample_ids(5)
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
