//! Parsing of generated headline payloads
//!
//! Generated text is first parsed strictly as JSON. Only when that fails does
//! the line-based extractor run, so each path can be exercised on its own.

use crate::metrics::METRICS;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Strict parse failure
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload contains no headlines")]
    Empty,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeadlinePayload {
    List(Vec<String>),
    Object { headlines: Vec<String> },
}

/// Strict parse of `["..", ..]` or `{"headlines": [..]}`
pub fn parse_headlines(raw: &str) -> Result<Vec<String>, ParseFailure> {
    let payload: HeadlinePayload = serde_json::from_str(strip_code_fence(raw))?;
    let headlines = match payload {
        HeadlinePayload::List(items) => items,
        HeadlinePayload::Object { headlines } => headlines,
    };

    let headlines: Vec<String> = headlines
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    if headlines.is_empty() {
        return Err(ParseFailure::Empty);
    }
    Ok(headlines)
}

/// Line-based extraction for payloads that are not JSON
pub fn extract_headlines_fallback(raw: &str) -> Vec<String> {
    raw.lines()
        .map(strip_bullet)
        .map(|line| line.trim_matches('"').trim())
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(str::to_string)
        .collect()
}

/// Strict parse, falling back to line extraction on failure
pub fn parse_or_extract(raw: &str) -> Vec<String> {
    match parse_headlines(raw) {
        Ok(headlines) => headlines,
        Err(failure) => {
            warn!("Headline payload parse failed, using line fallback: {}", failure);
            METRICS.headline_parse_fallbacks.inc();
            extract_headlines_fallback(raw)
        }
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.strip_prefix("json").unwrap_or(rest);
            body.strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .strip_prefix(['-', '*', '\u{2022}'])
        .unwrap_or(line)
        .trim_start();

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let parsed = parse_headlines(r#"["First take", "  Second take  "]"#).unwrap();
        assert_eq!(parsed, vec!["First take", "Second take"]);
    }

    #[test]
    fn test_parse_object_in_code_fence() {
        let raw = "```json\n{\"headlines\": [\"One\", \"\", \"Two\"]}\n```";
        assert_eq!(parse_headlines(raw).unwrap(), vec!["One", "Two"]);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_headlines("- not json"),
            Err(ParseFailure::InvalidJson(_))
        ));
        assert!(matches!(parse_headlines("[]"), Err(ParseFailure::Empty)));
        assert!(matches!(
            parse_headlines(r#"{"other": 1}"#),
            Err(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn test_fallback_strips_bullets() {
        let raw = "Here you go:\n- Creator ships v2\n* \"Talk recap\"\n\n1. Numbered item\n2) Other\n\u{2022} Dot";
        assert_eq!(
            extract_headlines_fallback(raw),
            vec![
                "Here you go:",
                "Creator ships v2",
                "Talk recap",
                "Numbered item",
                "Other",
                "Dot"
            ]
        );
    }

    #[test]
    fn test_parse_or_extract_prefers_json() {
        assert_eq!(parse_or_extract(r#"["A"]"#), vec!["A"]);
        assert_eq!(parse_or_extract("- A\n- B"), vec!["A", "B"]);
    }

    #[test]
    fn test_fallback_keeps_leading_numbers_without_marker() {
        assert_eq!(extract_headlines_fallback("2024 recap"), vec!["2024 recap"]);
    }
}
