use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\s+(\d+\.)").expect("numbered item pattern is valid"));

/// Turns the escape noise the agent CLI leaves in its replies back into readable text.
///
/// The rules run in a fixed order. Reordering them changes the result: the generic
/// backslash-space rule must come after the paragraph, list and colon rules, otherwise it
/// eats the sequences they look for.
pub fn unescape(text: &str) -> String {
    let mut out = text.replace("\\ \\ ", "\n\n");
    out = NUMBERED_ITEM.replace_all(&out, "\n$1").into_owned();
    out = out.replace(":\\\\", ":\n").replace(":\\ ", ":\n");
    out = out.replace("\\ ", "\n");
    out = out.replace("\\n\\n", "\n\n").replace("\\n", "\n");
    out = out.replace("\\'", "'").replace("\\\"", "\"");
    out = out.replace("\\t", "\t");
    out = out.replace("\\\\", "\\");
    if let Some(stripped) = out.strip_suffix('\\') {
        out = stripped.to_string();
    }
    out
}
