//! ESPN API raw documents: defensive access into loosely shaped JSON.
//! The normalizers in clean.rs / boxscore.rs read every field through these
//! helpers, so a missing key or an unexpected variant degrades to a default.
use crate::NormalizeError;
use serde::Deserialize;
use serde_json::Value;

/// Any ESPN payload: scoreboard event, game summary or play-by-play page.
pub type RawDocument = Value;

// ---------------------------------------------------------------------------
// Scoreboard / plays  (site v2 + core v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    /// Kept raw: each event is fed straight into `normalize_clean`.
    pub events: Option<Vec<RawDocument>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlaysResponse {
    pub count: Option<u32>,
    pub items: Option<Vec<RawDocument>>,
}

// ---------------------------------------------------------------------------
// Optional path traversal
// ---------------------------------------------------------------------------

/// Follow a JSON pointer (`/header/competitions/0`). Missing keys, wrong
/// variants and out-of-range indices all resolve to `None`; explicit nulls too.
pub fn lookup<'a>(doc: &'a Value, pointer: &str) -> Option<&'a Value> {
    doc.pointer(pointer).filter(|v| !v.is_null())
}

/// String-or-default. Numbers and booleans are rendered, everything else is "".
pub fn text(doc: &Value, pointer: &str) -> String {
    lookup(doc, pointer).map(scalar_text).unwrap_or_default()
}

pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Int-or-default. Accepts integers, floats (truncated) and numeric strings.
pub fn int(doc: &Value, pointer: &str) -> i64 {
    lookup(doc, pointer).and_then(as_int).unwrap_or_default()
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Attendance is never negative; anything unreadable counts as 0.
pub fn attendance(doc: &Value, pointer: &str) -> u64 {
    lookup(doc, pointer)
        .and_then(as_int)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or_default()
}

/// Competitor score. Absent → 0; present but not an integer is a type mismatch.
pub fn score(competitor: &Value, team: &str) -> Result<i64, NormalizeError> {
    match lookup(competitor, "/score") {
        None => Ok(0),
        Some(value) => as_int(value).ok_or_else(|| NormalizeError::NonNumericScore {
            team: team.to_owned(),
            value: value.to_string(),
        }),
    }
}

/// Array-or-empty.
pub fn items<'a>(doc: &'a Value, pointer: &str) -> &'a [Value] {
    lookup(doc, pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// First present candidate wins (`label` before `name`, `displayValue` before
/// `value`). A key holding null counts as absent.
pub fn first_text(doc: &Value, pointers: &[&str]) -> String {
    pointers
        .iter()
        .find_map(|p| lookup(doc, p))
        .map(scalar_text)
        .unwrap_or_default()
}

/// An empty object or null is treated the same as no document at all.
pub fn is_blank(doc: &Value) -> bool {
    match doc {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Play-by-play text
// ---------------------------------------------------------------------------

/// Play items come in several historical shapes; pick whichever text exists.
pub fn play_text(play: &Value) -> String {
    match play {
        Value::Object(_) => {}
        Value::String(s) => return s.clone(),
        other => return other.to_string(),
    }
    match lookup(play, "/text") {
        Some(Value::Object(_)) => {
            let text = first_text(play, &["/text/shortText", "/text/text"]);
            if text.is_empty() { "N/A".into() } else { text }
        }
        Some(value) => scalar_text(value),
        None => {
            let text = first_text(play, &["/description", "/play/text"]);
            if text.is_empty() { "N/A".into() } else { text }
        }
    }
}
