//! Headline generation seam
//!
//! Real generation happens in an external service; the pipeline only sees
//! the raw payload it returns. [`ExcerptHeadlineGenerator`] builds headlines
//! from the record itself and serves as the offline fallback.

use crate::content::SelectionCandidate;
use async_trait::async_trait;
use thiserror::Error;

/// Generator errors
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generator unavailable: {0}")]
    Unavailable(String),

    #[error("Generator returned an empty payload for {0}")]
    EmptyPayload(String),
}

/// Produces a raw headline payload for one selected item
#[async_trait]
pub trait HeadlineGenerator: Send + Sync {
    /// Raw payload, either a JSON list of headlines or free text
    async fn generate(&self, candidate: &SelectionCandidate) -> Result<String, GenerationError>;
}

/// Headline from title, or the description when the title is empty
#[derive(Debug, Clone, Default)]
pub struct ExcerptHeadlineGenerator;

#[async_trait]
impl HeadlineGenerator for ExcerptHeadlineGenerator {
    async fn generate(&self, candidate: &SelectionCandidate) -> Result<String, GenerationError> {
        let record = &candidate.record;
        let headline = [&record.title, &record.description_excerpt, &record.body_excerpt]
            .into_iter()
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .find(|text| !text.is_empty())
            .ok_or_else(|| GenerationError::EmptyPayload(record.id.clone()))?;

        serde_json::to_string(&[headline])
            .map_err(|e| GenerationError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::headlines::parse_headlines;
    use crate::content::{ContentRecord, SourceCategory};
    use chrono::Utc;

    fn candidate(title: &str, description: &str) -> SelectionCandidate {
        ContentRecord::new("rec-1", SourceCategory::GenericWeb, "c", "u", Utc::now())
            .with_text(title, description)
            .into()
    }

    #[tokio::test]
    async fn test_excerpt_generator_uses_title() {
        let payload = ExcerptHeadlineGenerator
            .generate(&candidate("  New   release ", "ignored"))
            .await
            .unwrap();
        assert_eq!(parse_headlines(&payload).unwrap(), vec!["New release"]);
    }

    #[tokio::test]
    async fn test_excerpt_generator_falls_back_to_description() {
        let payload = ExcerptHeadlineGenerator
            .generate(&candidate("", "A \"quoted\" description"))
            .await
            .unwrap();
        assert_eq!(
            parse_headlines(&payload).unwrap(),
            vec!["A \"quoted\" description"]
        );
    }

    #[tokio::test]
    async fn test_excerpt_generator_empty_record() {
        let result = ExcerptHeadlineGenerator.generate(&candidate("", "")).await;
        assert!(matches!(result, Err(GenerationError::EmptyPayload(_))));
    }
}
