// src/feedback.rs
//! Presentation formatter: turns one [`ListingRecord`] into the view-models the
//! UI renders — a rating banner, two score explanations, and suggestion blocks.
//!
//! Every function here is pure and per-record; they can run concurrently and
//! in any order.

use serde::Serialize;

use crate::dataset::ListingRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Good,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    #[serde(rename = "type")]
    pub kind: BannerKind,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreExplanation {
    pub value: String,
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionBlock {
    pub title: String,
    #[serde(rename = "list")]
    pub items: Vec<String>,
}

/// Affirmative banner for top-rated listings, informational otherwise.
/// A missing country renders as the literal "your country".
pub fn high_rated_banner(country: Option<&str>, high_rated: i64) -> Banner {
    let country = country.filter(|c| !c.is_empty()).unwrap_or("your country");
    if high_rated == 1 {
        return Banner {
            kind: BannerKind::Good,
            title: "✅ Great news!".to_string(),
            message: format!(
                "Your Airbnb is considered one of the top high-rated listings in {country}."
            ),
        };
    }
    Banner {
        kind: BannerKind::Info,
        title: "ℹ️ Insight".to_string(),
        message: format!(
            "There are listings rated higher than yours in {country}. \
             Below are actionable suggestions to help you improve."
        ),
    }
}

/// Description quality explanation, thresholds on a 0..100 scale.
pub fn description_explain(score: Option<f64>) -> ScoreExplanation {
    let Some(s) = score else {
        return ScoreExplanation {
            value: "N/A".to_string(),
            label: "Not available".to_string(),
            text: "Description score is not available for this listing.".to_string(),
        };
    };

    let (label, text) = if s >= 80.0 {
        ("High", "Your description is clear, well-structured, and informative.")
    } else if s >= 50.0 {
        (
            "Medium",
            "Your description is good, but it could be improved with clearer structure and more details.",
        )
    } else {
        (
            "Low",
            "Your description likely needs clearer structure and important missing details.",
        )
    };

    ScoreExplanation {
        value: format!("{s:.1} / 100"),
        label: label.to_string(),
        text: text.to_string(),
    }
}

/// Centrality explanation, thresholds on a normalized 0..1 scale.
pub fn centrality_explain(score: Option<f64>) -> ScoreExplanation {
    let Some(s) = score else {
        return ScoreExplanation {
            value: "N/A".to_string(),
            label: "Not available".to_string(),
            text: "Centrality score is not available for this listing.".to_string(),
        };
    };

    let (label, text) = if s >= 0.70 {
        ("High", "Your listing is in a very central area.")
    } else if s >= 0.45 {
        ("Medium", "Your listing is moderately central.")
    } else {
        (
            "Low",
            "Your listing is less central — mentioning nearby landmarks can help boost appeal.",
        )
    };

    ScoreExplanation {
        value: format!("{s:.3}"),
        label: label.to_string(),
        text: text.to_string(),
    }
}

/// Ordered suggestion blocks for a record. The landmarks block merges the
/// "mention landmarks" list with the separately labeled "top landmarks" list;
/// when all sources are empty, exactly one fallback block is returned.
pub fn build_suggestions(rec: &ListingRecord) -> Vec<SuggestionBlock> {
    let mut items = Vec::new();

    push_block(&mut items, "Add amenities", &rec.suggest_add_amenities);
    push_block(
        &mut items,
        "Mention amenities in your description",
        &rec.suggest_mention_amenities,
    );
    push_block(&mut items, "Pet-friendly note", &rec.suggest_pet_friendly);
    push_block(&mut items, "Add missing phrases", &rec.suggest_missing_phrases);

    if !rec.suggest_mention_landmarks.is_empty() || !rec.top_landmarks_to_mention.is_empty() {
        let mut list = rec.suggest_mention_landmarks.clone();
        if !rec.top_landmarks_to_mention.is_empty() {
            list.push("Top landmarks to mention:".to_string());
            list.extend(rec.top_landmarks_to_mention.iter().cloned());
        }
        items.push(SuggestionBlock {
            title: "Improve location appeal (landmarks)".to_string(),
            items: list,
        });
    }

    if items.is_empty() {
        items.push(SuggestionBlock {
            title: "No major issues detected".to_string(),
            items: vec![
                "Your listing looks good! Consider small refinements to stay competitive."
                    .to_string(),
            ],
        });
    }

    items
}

fn push_block(out: &mut Vec<SuggestionBlock>, title: &str, list: &[String]) {
    if !list.is_empty() {
        out.push(SuggestionBlock {
            title: title.to_string(),
            items: list.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_record(id: &str) -> ListingRecord {
        ListingRecord {
            listing_id: id.to_string(),
            seller_id: None,
            country: None,
            high_rated: 0,
            description_score: None,
            centrality_score_sel: None,
            suggest_add_amenities: Vec::new(),
            suggest_mention_amenities: Vec::new(),
            suggest_pet_friendly: Vec::new(),
            suggest_missing_phrases: Vec::new(),
            suggest_mention_landmarks: Vec::new(),
            top_landmarks_to_mention: Vec::new(),
            extra: Default::default(),
        }
    }

    #[test]
    fn banner_good_names_the_country() {
        let b = high_rated_banner(Some("US"), 1);
        assert_eq!(b.kind, BannerKind::Good);
        assert!(b.message.contains("in US."), "{}", b.message);
    }

    #[test]
    fn banner_falls_back_to_your_country() {
        let b = high_rated_banner(None, 0);
        assert_eq!(b.kind, BannerKind::Info);
        assert!(b.message.contains("in your country."), "{}", b.message);
    }

    #[test]
    fn description_labels_and_boundaries() {
        let na = description_explain(None);
        assert_eq!(na.value, "N/A");
        assert_eq!(na.label, "Not available");

        assert_eq!(description_explain(Some(85.0)).label, "High");
        assert_eq!(description_explain(Some(80.0)).label, "High");
        assert_eq!(description_explain(Some(50.0)).label, "Medium");
        assert_eq!(description_explain(Some(49.9)).label, "Low");
    }

    #[test]
    fn description_value_is_one_decimal_out_of_100() {
        assert_eq!(description_explain(Some(85.25)).value, "85.2 / 100");
    }

    #[test]
    fn centrality_labels_and_boundaries() {
        assert_eq!(centrality_explain(None).label, "Not available");
        assert_eq!(centrality_explain(Some(0.70)).label, "High");
        assert_eq!(centrality_explain(Some(0.45)).label, "Medium");
        assert_eq!(centrality_explain(Some(0.449)).label, "Low");
        assert_eq!(centrality_explain(Some(0.7)).value, "0.700");
    }

    #[test]
    fn all_empty_suggestions_yield_single_fallback_block() {
        let blocks = build_suggestions(&bare_record("1"));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "No major issues detected");
        assert_eq!(blocks[0].items.len(), 1);
    }

    #[test]
    fn blocks_keep_field_order() {
        let mut rec = bare_record("1");
        rec.suggest_add_amenities = vec!["wifi".into()];
        rec.suggest_missing_phrases = vec!["near metro".into()];
        let blocks = build_suggestions(&rec);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title, "Add amenities");
        assert_eq!(blocks[1].title, "Add missing phrases");
    }

    #[test]
    fn landmarks_merge_with_header_line_between() {
        let mut rec = bare_record("1");
        rec.suggest_mention_landmarks = vec!["Old Town".into()];
        rec.top_landmarks_to_mention = vec!["Cathedral".into(), "Harbor".into()];
        let blocks = build_suggestions(&rec);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "Improve location appeal (landmarks)");
        assert_eq!(
            blocks[0].items,
            vec!["Old Town", "Top landmarks to mention:", "Cathedral", "Harbor"]
        );
    }

    #[test]
    fn top_landmarks_alone_still_get_the_header() {
        let mut rec = bare_record("1");
        rec.top_landmarks_to_mention = vec!["Cathedral".into()];
        let blocks = build_suggestions(&rec);
        assert_eq!(blocks[0].items, vec!["Top landmarks to mention:", "Cathedral"]);
    }
}
