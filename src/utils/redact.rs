use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const HEADER_REDACTION: &str = "[REDACTED]";

const SENSITIVE_HEADERS: &[&str] = &["authorization", "proxy-authorization", "x-api-key"];

static INLINE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\b(Bearer)\s+([A-Za-z0-9._~+/=-]{6,})").expect("bearer redaction regex"),
            "$1 ***REDACTED***",
        ),
        (
            Regex::new(r#"\b(api[_-]?key|apiKey|token)\b\s*([:=])\s*([^\s"',}]+)"#)
                .expect("key redaction regex"),
            "$1$2***REDACTED***",
        ),
    ]
});

fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

/// Masks bearer tokens and `api_key=`-style pairs, then caps the length.
pub fn redact_text(value: &str, max_chars: usize) -> String {
    let mut out = value.to_string();
    for (pattern, replacement) in INLINE_PATTERNS.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
    }
    truncate_chars(&out, max_chars)
}

pub fn redact_headers<'a, I>(headers: I) -> Value
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = serde_json::Map::new();
    for (name, value) in headers {
        let rendered = if SENSITIVE_HEADERS.contains(&name.trim().to_lowercase().as_str()) {
            HEADER_REDACTION.to_string()
        } else {
            value.to_string()
        };
        out.insert(name.to_string(), Value::String(rendered));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_tokens_are_masked() {
        let out = redact_text("Authorization: Bearer abcdef123456", usize::MAX);
        assert_eq!(out, "Authorization: Bearer ***REDACTED***");
    }

    #[test]
    fn api_key_pairs_are_masked() {
        let out = redact_text("apiKey=supersecret rest", usize::MAX);
        assert_eq!(out, "apiKey=***REDACTED*** rest");
    }

    #[test]
    fn long_text_is_capped_on_char_boundary() {
        assert_eq!(redact_text("ééééé", 2), "éé...");
        assert_eq!(redact_text("short", 10), "short");
    }

    #[test]
    fn authorization_header_is_hidden() {
        let out = redact_headers([("Authorization", "Bearer k"), ("Accept", "application/json")]);
        assert_eq!(out["Authorization"], "[REDACTED]");
        assert_eq!(out["Accept"], "application/json");
    }
}
