//! Tolerant scalar coercions shared by the tabular and structured parsers.
//!
//! Dataset exports are messy: numeric columns arrive as strings, missing values
//! arrive as `""`, `"nan"`, `"none"` or `"null"`, and list columns arrive as
//! native arrays, `"['a','b']"` pseudo-lists, or `"a; b"` joins. Every helper
//! here resolves bad input to a well-defined default and never returns an error.

use serde_json::Value;

/// Tokens that stand in for "no value" in exported datasets.
pub fn is_null_token(s: &str) -> bool {
    s.is_empty() || matches!(s.to_ascii_lowercase().as_str(), "nan" | "none" | "null")
}

/// Coerce a field to a trimmed, non-empty string. Null-ish values become `None`.
/// Numbers are rendered via serde_json's exact formatting, so integer ids keep
/// their digits (no float round-trip).
pub fn as_trimmed_str(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::Null => None,
        Value::String(s) => {
            let t = s.trim();
            if is_null_token(t) {
                None
            } else {
                Some(t.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce a field to a float. Anything unparseable is `None`.
pub fn as_float(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim();
            if is_null_token(t) {
                None
            } else {
                t.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Coerce a field to an integer, going through float so `"1.0"` reads as 1.
/// Unparseable or absent values fall back to `default`.
pub fn as_int(v: Option<&Value>, default: i64) -> i64 {
    match v {
        Some(Value::Bool(b)) => *b as i64,
        _ => as_float(v).map(|f| f as i64).unwrap_or(default),
    }
}

/// Normalize a list-ish field to an ordered `Vec<String>`.
///
/// Accepted encodings:
/// - native JSON arrays (elements coerced via [`as_trimmed_str`])
/// - bracketed pseudo-lists like `"['wifi', 'parking']"`
/// - delimited joins: `;` preferred, then `,`
/// - a bare scalar, kept as a single element
///
/// Idempotent: feeding an already-normalized array back in yields the same
/// sequence.
pub fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|it| as_trimmed_str(Some(it)))
            .collect(),
        Some(Value::String(s)) => split_list_text(s),
        Some(other) => as_trimmed_str(Some(other)).into_iter().collect(),
    }
}

fn split_list_text(s: &str) -> Vec<String> {
    let s = s.trim();
    if is_null_token(s) || s == "[]" {
        return Vec::new();
    }

    // strip brackets/quotes from pseudo-list syntax
    let cleaned = s
        .trim_matches(|c| c == '[' || c == ']')
        .replace(['\'', '"'], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Vec::new();
    }

    let parts: Vec<&str> = if cleaned.contains(';') {
        cleaned.split(';').collect()
    } else if cleaned.contains(',') {
        cleaned.split(',').collect()
    } else {
        vec![cleaned]
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_tokens_are_absent() {
        for tok in ["", "nan", "NaN", "None", "NULL", "  null  "] {
            let v = json!(tok);
            assert_eq!(as_trimmed_str(Some(&v)), None, "token {tok:?}");
            assert_eq!(as_float(Some(&v)), None, "token {tok:?}");
        }
        assert_eq!(as_trimmed_str(Some(&Value::Null)), None);
        assert_eq!(as_trimmed_str(None), None);
    }

    #[test]
    fn long_integer_ids_keep_their_digits() {
        let v = json!(12345678901234567_u64);
        assert_eq!(as_trimmed_str(Some(&v)).unwrap(), "12345678901234567");
    }

    #[test]
    fn as_int_goes_through_float() {
        assert_eq!(as_int(Some(&json!("1")), 0), 1);
        assert_eq!(as_int(Some(&json!("1.0")), 0), 1);
        assert_eq!(as_int(Some(&json!(true)), 0), 1);
        assert_eq!(as_int(Some(&json!("bogus")), 7), 7);
        assert_eq!(as_int(None, 0), 0);
    }

    #[test]
    fn as_float_parses_or_defaults() {
        assert_eq!(as_float(Some(&json!("85.5"))), Some(85.5));
        assert_eq!(as_float(Some(&json!(0.7))), Some(0.7));
        assert_eq!(as_float(Some(&json!("not a number"))), None);
    }

    #[test]
    fn string_list_handles_delimiter_variants() {
        assert_eq!(
            string_list(Some(&json!("wifi; parking; pool"))),
            vec!["wifi", "parking", "pool"]
        );
        assert_eq!(string_list(Some(&json!("wifi, parking"))), vec!["wifi", "parking"]);
        assert_eq!(string_list(Some(&json!("just one"))), vec!["just one"]);
    }

    #[test]
    fn string_list_strips_pseudo_list_syntax() {
        assert_eq!(
            string_list(Some(&json!("['wifi', 'parking']"))),
            vec!["wifi", "parking"]
        );
        assert_eq!(string_list(Some(&json!("[\"a\", \"b\"]"))), vec!["a", "b"]);
        assert_eq!(string_list(Some(&json!("[]"))), Vec::<String>::new());
    }

    #[test]
    fn string_list_empty_inputs() {
        assert_eq!(string_list(None), Vec::<String>::new());
        assert_eq!(string_list(Some(&Value::Null)), Vec::<String>::new());
        assert_eq!(string_list(Some(&json!("nan"))), Vec::<String>::new());
        assert_eq!(string_list(Some(&json!("  "))), Vec::<String>::new());
    }

    #[test]
    fn string_list_is_idempotent_over_clean_arrays() {
        let first = string_list(Some(&json!("a; b; c")));
        let again = string_list(Some(&json!(first.clone())));
        assert_eq!(first, again);
    }
}
