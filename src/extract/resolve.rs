use serde_json::Value;

use super::unescape::unescape;

const MAX_DEPTH: usize = 16;

/// Walks a parsed JSON value looking for the reply text.
pub fn resolve_reply(value: &Value) -> Option<String> {
    resolve_at(value, 0).filter(|s| !s.is_empty())
}

fn resolve_at(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => resolve_at(items.first()?, depth + 1),
        Value::Object(map) => {
            if let Some(text) = map.get("text").and_then(|v| resolve_at(v, depth + 1)) {
                return Some(text);
            }
            if let Some(text) = map
                .get("result")
                .and_then(|r| r.get("content"))
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .and_then(|first| first.get("text"))
                .and_then(|v| resolve_at(v, depth + 1))
            {
                return Some(text);
            }
            if let Some(first) = map
                .get("response")
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                && let Some(text) = resolve_response_item(first, depth + 1)
            {
                return Some(text);
            }
            if let Some(text) = map.get("message").and_then(non_empty_str) {
                return Some(text);
            }
            match map.get("content") {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Array(items)) => match items.first()? {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Object(inner) => inner.get("text").and_then(non_empty_str),
                    _ => None,
                },
                _ => None,
            }
        }
        _ => None,
    }
}

/// First element of a `response` array. The agent CLI puts the serialized reply there,
/// usually as a byte-string literal (`b'{...}'`).
fn resolve_response_item(item: &Value, depth: usize) -> Option<String> {
    let Value::String(s) = item else {
        return resolve_at(item, depth);
    };
    if let Some(inner) = strip_byte_literal(s) {
        return resolve_byte_literal(inner, depth);
    }
    match serde_json::from_str::<Value>(s) {
        Ok(parsed) if !parsed.is_string() => resolve_at(&parsed, depth),
        _ => non_empty_str(item),
    }
}

/// Parses the literal's content as JSON, first as-is, then with only the repr escapes undone,
/// then fully unescaped. The raw text is returned only when none of those parse.
fn resolve_byte_literal(inner: &str, depth: usize) -> Option<String> {
    let repr_decoded = decode_repr_escapes(inner);
    let cleaned = unescape(inner);
    for candidate in [inner, repr_decoded.as_str(), cleaned.as_str()] {
        if let Ok(parsed) = serde_json::from_str::<Value>(candidate) {
            return resolve_at(&parsed, depth).map(|text| unescape(&text));
        }
    }
    Some(cleaned).filter(|s| !s.is_empty())
}

/// Undoes the escaping Python adds when printing bytes: `\'` and `\\`, in one pass.
/// Any other escape is left for the JSON parser.
fn decode_repr_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Returns the text between `b'` and the closing `'`.
pub fn strip_byte_literal(s: &str) -> Option<&str> {
    s.strip_prefix("b'")?.strip_suffix('\'')
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
