//! Recovery of the structured payload from free-text model replies.
//!
//! Models wrap the requested JSON in prose or code fences often enough that
//! the reply is scanned for the first brace-delimited object rather than
//! parsed whole.

use serde_json::{Map, Value};

use crate::DEFAULT_CREDIBILITY;

/// Fields recovered from a reply. A missing summary is left for the caller to default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnalysis {
    pub summary: Option<String>,
    pub credibility: u8,
}

/// Parse a model reply; `None` when no JSON object can be recovered.
pub fn parse_reply(reply: &str) -> Option<ParsedAnalysis> {
    let object = extract_json_object(reply)?;
    let summary = object
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let credibility = object
        .get("credibility")
        .and_then(coerce_credibility)
        .unwrap_or(DEFAULT_CREDIBILITY);
    Some(ParsedAnalysis {
        summary,
        credibility,
    })
}

/// Finds the first balanced `{...}` span that parses as a JSON object.
///
/// Falls back to the span between the first `{` and the last `}` when no
/// balanced candidate parses.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    for (start, _) in text.match_indices('{') {
        if let Some(end) = balanced_end(&text[start..]) {
            if let Ok(Value::Object(map)) = serde_json::from_str(&text[start..start + end]) {
                return Some(map);
            }
        }
    }

    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    match serde_json::from_str(&text[first..=last]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Byte length of the balanced object at the start of `text`, string and escape aware.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Numbers are rounded and numeric strings accepted; the result is clamped to `0..=100`.
pub fn coerce_credibility(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}
