//! Response Normalizer — turns loosely-structured model output into `PromoContent`.
//!
//! Pipeline, single attempt, no fallback heuristics:
//! 1. strip `**` emphasis markers
//! 2. collapse newlines and whitespace runs to single spaces
//! 3. locate the outermost `{ ... }` span
//! 4. drop trailing commas before `}` / `]`
//! 5. collapse duplicate commas
//! 6. quote bare object keys
//! 7. parse, then validate the four required fields
//!
//! Rules 4-6 only rewrite text outside string literals. The repair is a
//! best-effort cleanup, not a JSON grammar repair.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::promo::models::PromoContent;

const EMPHASIS_MARKER: &str = "**";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static JSON_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(?:\s*,)*\s*([}\]])").expect("valid regex"));
static DUPLICATE_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(?:\s*,)+").expect("valid regex"));
static BARE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*:)").expect("valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("No JSON found in response")]
    NoJsonFound,

    #[error("Failed to parse JSON: {0}")]
    ParseError(String),

    #[error("Invalid response structure: missing or empty '{0}'")]
    MissingField(&'static str),
}

/// Repairs, parses, and validates one raw model reply.
pub fn normalize(raw_text: &str) -> Result<PromoContent, NormalizeError> {
    let cleaned = collapse_whitespace(&strip_emphasis(raw_text));
    let span = extract_json_span(&cleaned).ok_or(NormalizeError::NoJsonFound)?;
    let repaired = quote_bare_keys(&collapse_duplicate_commas(&remove_trailing_commas(span)));

    let value: Value =
        serde_json::from_str(&repaired).map_err(|e| NormalizeError::ParseError(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| NormalizeError::ParseError("top-level value is not an object".into()))?;

    Ok(PromoContent {
        hook: required_string(object, "hook")?,
        video_story: required_string(object, "videoStory")?,
        caption: required_string(object, "caption")?,
        hashtags: required_hashtags(object)?,
    })
}

pub fn strip_emphasis(text: &str) -> String {
    text.replace(EMPHASIS_MARKER, "")
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Greedy: first `{` through last `}`.
pub fn extract_json_span(text: &str) -> Option<&str> {
    JSON_SPAN.find(text).map(|m| m.as_str())
}

pub fn remove_trailing_commas(text: &str) -> String {
    outside_strings(text, |segment| {
        TRAILING_COMMA.replace_all(segment, "$1").into_owned()
    })
}

pub fn collapse_duplicate_commas(text: &str) -> String {
    outside_strings(text, |segment| {
        DUPLICATE_COMMA.replace_all(segment, ",").into_owned()
    })
}

pub fn quote_bare_keys(text: &str) -> String {
    outside_strings(text, |segment| {
        BARE_KEY.replace_all(segment, "$1\"$2\"$3").into_owned()
    })
}

/// Applies `rewrite` to every stretch of `text` that is not inside a
/// double-quoted string literal. Literals are copied through untouched.
fn outside_strings(text: &str, rewrite: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut segment_start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                out.push_str(&text[segment_start..=i]);
                segment_start = i + 1;
                in_string = false;
            }
        } else if c == '"' {
            out.push_str(&rewrite(&text[segment_start..i]));
            segment_start = i;
            in_string = true;
        }
    }

    let rest = &text[segment_start..];
    if in_string {
        out.push_str(rest);
    } else {
        out.push_str(&rewrite(rest));
    }
    out
}

/// Strips emphasis markers; `None` when nothing but whitespace is left.
fn clean_field(value: &str) -> Option<String> {
    let cleaned = strip_emphasis(value);
    (!cleaned.trim().is_empty()).then_some(cleaned)
}

fn required_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, NormalizeError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .and_then(clean_field)
        .ok_or(NormalizeError::MissingField(field))
}

/// Every item must be a non-blank string; one bad item rejects the list.
fn required_hashtags(object: &Map<String, Value>) -> Result<Vec<String>, NormalizeError> {
    let tags = object
        .get("hashtags")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or(NormalizeError::MissingField("hashtags"))?;

    tags.iter()
        .map(|item| item.as_str().and_then(clean_field))
        .collect::<Option<Vec<String>>>()
        .ok_or(NormalizeError::MissingField("hashtags"))
}
