//! Recovers a readable reply from the agent CLI's raw output.
//!
//! The CLI prints log lines, a JSON envelope and, inside it, a Python byte-string literal
//! holding another JSON document. None of that is guaranteed, so extraction is a chain of
//! independent strategies tried in order until one yields text.

mod resolve;
mod strategies;
mod unescape;

use tracing::debug;

type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("whole_output_json", strategies::whole_output_json),
    ("labeled_response_section", strategies::labeled_response_section),
    ("bracketed_objects", strategies::bracketed_objects),
    ("field_regex", strategies::field_regex),
    ("plain_text", strategies::plain_text),
];

/// Returns the best-effort reply, or `None` when every strategy comes up empty.
pub fn extract(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    for (name, strategy) in STRATEGIES {
        match strategy(raw) {
            Some(reply) if !reply.trim().is_empty() => {
                debug!(strategy = *name, reply_len = reply.len(), "extracted agent reply");
                return Some(reply);
            }
            _ => debug!(strategy = *name, "strategy found nothing"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::strategies::PLAIN_TEXT_LIMIT;
    use super::unescape::unescape;
    use super::*;

    #[test]
    fn text_object() {
        assert_eq!(extract(r#"{"text": "X"}"#).as_deref(), Some("X"));
        assert_eq!(
            extract(r#"{"text": "keeps \\ backslashes"}"#).as_deref(),
            Some(r"keeps \ backslashes")
        );
    }

    #[test]
    fn result_content_object() {
        assert_eq!(
            extract(r#"{"result": {"content": [{"text": "X"}]}}"#).as_deref(),
            Some("X")
        );
    }

    #[test]
    fn byte_literal_envelope() {
        let raw = r#"{"response": ["b'{\"result\": {\"content\": [{\"text\": \"Top picks:\\n1. Kindle\"}]}}'"]}"#;
        assert_eq!(extract(raw).as_deref(), Some("Top picks:\n1. Kindle"));
    }

    #[test]
    fn labeled_response_with_doubled_escapes() {
        let raw = r#"Response: {"response": ["b'{\\"result\\": {\\"content\\": [{\\"text\\": \\"Hello there\\"}]}}'"]}"#;
        assert_eq!(extract(raw).as_deref(), Some("Hello there"));
    }

    #[test]
    fn full_cli_transcript() {
        let raw = concat!(
            "Payload:\n{\n  \"prompt\": \"find me a desk lamp\"\n}\n",
            "Invoking BedrockAgentCore agent 'async_shopping_strands' via cloud endpoint\n",
            "Session ID: 0f3c2a7e-5d1b-4d6e-9a0b-7f1e2d3c4b5a\n\n",
            "Response:\n{\n  \"ResponseMetadata\": {\"HTTPStatusCode\": 200},\n",
            "  \"response\": [\"b'{\\\"result\\\": {\\\"role\\\": \\\"assistant\\\", ",
            "\\\"content\\\": [{\\\"text\\\": \\\"Here are two lamps:\\\\\\\\n1. Arc lamp\\\"}]}}'\"]\n}\n",
        );
        assert_eq!(extract(raw).as_deref(), Some("Here are two lamps:\n1. Arc lamp"));
    }

    #[test]
    fn plain_text_reply() {
        assert_eq!(extract("just plain text").as_deref(), Some("just plain text"));
        assert_eq!(extract("  padded reply\n").as_deref(), Some("padded reply"));
    }

    #[test]
    fn empty_or_blank_is_absent() {
        assert_eq!(extract(""), None);
        assert_eq!(extract(" \n\t "), None);
    }

    #[test]
    fn unparsable_output_is_absent() {
        assert_eq!(extract(r#"{"status": "accepted", "id": 7}"#), None);
        let long_log = format!("[{}]", "x".repeat(PLAIN_TEXT_LIMIT));
        assert_eq!(extract(&long_log), None);
    }

    #[test]
    fn byte_literal_without_reply_is_absent() {
        let raw = r#"{"response": ["b'{\"status\": \"ok\", \"id\": 7}'"]}"#;
        assert_eq!(extract(raw), None);
    }

    #[test]
    fn byte_literal_with_python_escapes() {
        let raw = r#"{"response": ["b'{\"result\": {\"content\": [{\"text\": \"It\\'s here:\\\\n1. A\"}]}}'"]}"#;
        assert_eq!(extract(raw).as_deref(), Some("It's here:\n1. A"));
    }

    #[test]
    fn unescape_is_idempotent_on_clean_text() {
        for text in ["plain", "two\nlines", "quote \" and ' marks", "1. one 2. two"] {
            let once = unescape(text);
            assert_eq!(once, text);
            assert_eq!(unescape(&once), once);
        }
    }
}
