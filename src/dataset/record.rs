//! Typed listing record.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::dataset::value::{as_float, as_int, as_trimmed_str, string_list};
use crate::dataset::RawRecord;

/// One listing row, with the known fields coerced up-front and everything else
/// preserved in `extra` so unrecognized suggestion columns survive a reload.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ListingRecord {
    pub listing_id: String,
    pub seller_id: Option<String>,
    pub country: Option<String>,
    /// 0/1 precomputed top-tier rating flag.
    pub high_rated: i64,
    /// Precomputed description quality, expected 0..100.
    pub description_score: Option<f64>,
    /// Precomputed geographic centrality, expected 0..1.
    pub centrality_score_sel: Option<f64>,
    pub suggest_add_amenities: Vec<String>,
    pub suggest_mention_amenities: Vec<String>,
    pub suggest_pet_friendly: Vec<String>,
    pub suggest_missing_phrases: Vec<String>,
    pub suggest_mention_landmarks: Vec<String>,
    pub top_landmarks_to_mention: Vec<String>,
    pub extra: BTreeMap<String, Value>,
}

const KNOWN_FIELDS: &[&str] = &[
    "listing_id",
    "seller_id",
    "country",
    "high_rated",
    "description_score",
    "centrality_score_sel",
    "suggest_add_amenities",
    "suggest_mention_amenities",
    "suggest_pet_friendly",
    "suggest_missing_phrases",
    "suggest_mention_landmarks",
    "top_landmarks_to_mention",
];

impl ListingRecord {
    /// Build from a parsed raw record. Returns `None` when the record carries
    /// no usable `listing_id` (missing, empty, or a null token).
    pub fn from_raw(raw: RawRecord) -> Option<Self> {
        let listing_id = as_trimmed_str(raw.get("listing_id"))?;

        let rec = Self {
            listing_id,
            seller_id: as_trimmed_str(raw.get("seller_id")),
            country: as_trimmed_str(raw.get("country")),
            high_rated: as_int(raw.get("high_rated"), 0),
            description_score: as_float(raw.get("description_score")),
            centrality_score_sel: as_float(raw.get("centrality_score_sel")),
            suggest_add_amenities: string_list(raw.get("suggest_add_amenities")),
            suggest_mention_amenities: string_list(raw.get("suggest_mention_amenities")),
            suggest_pet_friendly: string_list(raw.get("suggest_pet_friendly")),
            suggest_missing_phrases: string_list(raw.get("suggest_missing_phrases")),
            suggest_mention_landmarks: string_list(raw.get("suggest_mention_landmarks")),
            top_landmarks_to_mention: string_list(raw.get("top_landmarks_to_mention")),
            extra: raw
                .into_iter()
                .filter(|(k, _)| !KNOWN_FIELDS.contains(&k.as_str()))
                .collect(),
        };
        Some(rec)
    }
}
