use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::resolve::resolve_reply;
use super::unescape::unescape;

/// Replies shorter than this with no JSON punctuation are taken as plain text.
pub const PLAIN_TEXT_LIMIT: usize = 500;

static RESPONSE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Response:\s*\{").expect("response marker pattern is valid"));
static FLAT_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}]*\}").expect("flat object pattern is valid"));
static FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:text|message|content|result)"\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("field pattern is valid")
});
static ESCAPED_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\\+"(?:text|message|content|result)\\+"\s*:\s*\\+"(.*?)\\+""#)
        .expect("escaped field pattern is valid")
});

pub fn whole_output_json(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    if !value.is_object() {
        return None;
    }
    resolve_reply(&value)
}

/// The agent CLI prints `Payload:` and `Session ID:` lines before a `Response: {...}` block.
pub fn labeled_response_section(raw: &str) -> Option<String> {
    let marker = RESPONSE_MARKER.find(raw)?;
    let json_part = &raw[marker.end() - 1..];
    if let Some(value) = first_json_value(json_part)
        && let Some(text) = resolve_reply(&value)
    {
        return Some(text);
    }
    let repaired = json_part.replace("\\\\\"", "\\\"");
    let value = first_json_value(&repaired)?;
    resolve_reply(&value)
}

pub fn bracketed_objects(raw: &str) -> Option<String> {
    FLAT_OBJECT.find_iter(raw).find_map(|m| {
        serde_json::from_str::<Value>(m.as_str())
            .ok()
            .and_then(|value| resolve_reply(&value))
    })
}

pub fn field_regex(raw: &str) -> Option<String> {
    let captured = FIELD
        .captures(raw)
        .or_else(|| ESCAPED_FIELD.captures(raw))?
        .get(1)?
        .as_str();
    let text = unescape(captured);
    if text.trim().is_empty() { None } else { Some(text) }
}

pub fn plain_text(raw: &str) -> Option<String> {
    if raw.chars().count() >= PLAIN_TEXT_LIMIT {
        return None;
    }
    if raw.contains(['{', '}', '[', ']', '"']) {
        return None;
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses the first JSON value at the start of `text`, ignoring whatever follows it.
fn first_json_value(text: &str) -> Option<Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()?
        .ok()
}
