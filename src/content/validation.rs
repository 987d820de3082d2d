//! Boundary validation for incoming records
//!
//! Malformed records are skipped and reported; the rest of the batch keeps
//! flowing. Only the text fields may be absent; numeric fields are rejected
//! rather than clamped.

use super::models::{ContentRecord, IncomingRecord};
use crate::error::{DigestError, Result};
use crate::metrics::METRICS;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Upper bound of the relevance scale
pub const MAX_RELEVANCE_SCORE: f64 = 100.0;

/// Outcome of validating one batch
#[derive(Debug, Default)]
pub struct ValidatedBatch {
    pub records: Vec<ContentRecord>,
    pub rejected: Vec<DigestError>,
}

impl ValidatedBatch {
    pub fn skipped(&self) -> usize {
        self.rejected.len()
    }
}

/// Validate a single record
pub fn validate_record(incoming: IncomingRecord) -> Result<ContentRecord> {
    let id = match incoming.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Err(DigestError::invalid_record(None, "missing id")),
    };

    let source_category = incoming
        .source_category
        .ok_or_else(|| DigestError::invalid_record(Some(id.as_str()), "missing source category"))?;

    let creator_id = required_text(incoming.creator_id, &id, "creator id")?;
    let canonical_url = required_text(incoming.canonical_url, &id, "canonical url")?;

    let published_at = incoming
        .published_at
        .ok_or_else(|| DigestError::invalid_record(Some(id.as_str()), "missing published time"))?;

    let engagement_score = incoming
        .engagement_score
        .ok_or_else(|| DigestError::invalid_record(Some(id.as_str()), "missing engagement score"))?;
    if !engagement_score.is_finite() || engagement_score < 0.0 {
        return Err(DigestError::invalid_record(
            Some(id.as_str()),
            format!("engagement score {} is not a non-negative number", engagement_score),
        ));
    }

    let relevance_score = incoming
        .relevance_score
        .ok_or_else(|| DigestError::invalid_record(Some(id.as_str()), "missing relevance score"))?;
    if !relevance_score.is_finite() || !(0.0..=MAX_RELEVANCE_SCORE).contains(&relevance_score) {
        return Err(DigestError::invalid_record(
            Some(id.as_str()),
            format!("relevance score {} outside 0..=100", relevance_score),
        ));
    }

    Ok(ContentRecord {
        id,
        source_category,
        creator_id,
        title: incoming.title.unwrap_or_default(),
        description_excerpt: incoming.description_excerpt.unwrap_or_default(),
        body_excerpt: incoming.body_excerpt.unwrap_or_default(),
        canonical_url,
        published_at,
        engagement_score,
        relevance_score,
    })
}

fn required_text(value: Option<String>, id: &str, field: &str) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(DigestError::invalid_record(Some(id), format!("missing {}", field))),
    }
}

/// Validate a batch, skipping invalid records and repeated ids
pub fn validate_batch(incoming: Vec<IncomingRecord>) -> ValidatedBatch {
    let mut batch = ValidatedBatch::default();
    let mut seen_ids = HashSet::new();

    for record in incoming {
        match validate_record(record) {
            Ok(record) => {
                if seen_ids.insert(record.id.clone()) {
                    batch.records.push(record);
                } else {
                    batch.rejected.push(DigestError::invalid_record(
                        Some(record.id.as_str()),
                        "duplicate id in batch",
                    ));
                }
            }
            Err(err) => batch.rejected.push(err),
        }
    }

    for err in &batch.rejected {
        warn!("Skipping record: {}", err);
    }

    METRICS.records_accepted.inc_by(batch.records.len() as f64);
    METRICS.records_rejected.inc_by(batch.rejected.len() as f64);

    debug!(
        "Validated batch: accepted={}, skipped={}",
        batch.records.len(),
        batch.skipped()
    );

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::models::SourceCategory;
    use chrono::{TimeZone, Utc};

    fn incoming(id: &str) -> IncomingRecord {
        IncomingRecord {
            id: Some(id.to_string()),
            source_category: Some(SourceCategory::LongFormVideo),
            creator_id: Some("creator".to_string()),
            canonical_url: Some("https://example.com/v/1".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            engagement_score: Some(10.0),
            relevance_score: Some(80.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_record_passes() {
        let record = validate_record(incoming("a")).unwrap();
        assert_eq!(record.id, "a");
        assert_eq!(record.title, "");
        assert_eq!(record.relevance_score, 80.0);
    }

    #[test]
    fn test_missing_id_rejected() {
        let mut raw = incoming("a");
        raw.id = Some("  ".to_string());
        assert!(matches!(
            validate_record(raw),
            Err(DigestError::InvalidRecord { id: None, .. })
        ));
    }

    #[test]
    fn test_missing_category_rejected() {
        let mut raw = incoming("a");
        raw.source_category = None;
        let err = validate_record(raw).unwrap_err();
        assert!(err.to_string().contains("missing source category"));
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        let cases: [(fn(&mut IncomingRecord), &str); 6] = [
            (|r| r.creator_id = None, "missing creator id"),
            (|r| r.creator_id = Some(" ".to_string()), "missing creator id"),
            (|r| r.canonical_url = None, "missing canonical url"),
            (|r| r.published_at = None, "missing published time"),
            (|r| r.engagement_score = None, "missing engagement score"),
            (|r| r.relevance_score = None, "missing relevance score"),
        ];

        for (clear, reason) in cases {
            let mut raw = incoming("a");
            clear(&mut raw);
            let err = validate_record(raw).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid record a: {}", reason));
        }
    }

    #[test]
    fn test_text_fields_optional() {
        let mut raw = incoming("a");
        raw.title = None;
        raw.description_excerpt = None;
        raw.body_excerpt = None;
        let record = validate_record(raw).unwrap();
        assert_eq!(record.description_excerpt, "");
        assert_eq!(record.body_excerpt, "");
    }

    #[test]
    fn test_sparse_record_skipped_in_batch() {
        let sparse = IncomingRecord {
            id: Some("sparse".to_string()),
            source_category: Some(SourceCategory::GenericWeb),
            ..Default::default()
        };
        let batch = validate_batch(vec![sparse, incoming("a")]);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.skipped(), 1);
    }

    #[test]
    fn test_negative_scores_rejected_not_clamped() {
        let mut raw = incoming("a");
        raw.engagement_score = Some(-1.0);
        assert!(validate_record(raw).is_err());

        let mut raw = incoming("b");
        raw.relevance_score = Some(-0.5);
        assert!(validate_record(raw).is_err());

        let mut raw = incoming("c");
        raw.relevance_score = Some(100.5);
        assert!(validate_record(raw).is_err());

        let mut raw = incoming("d");
        raw.engagement_score = Some(f64::NAN);
        assert!(validate_record(raw).is_err());
    }

    #[test]
    fn test_batch_skips_and_counts() {
        let mut bad = incoming("bad");
        bad.source_category = None;

        let batch = validate_batch(vec![incoming("a"), bad, incoming("b"), incoming("a")]);

        let ids: Vec<_> = batch.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(batch.skipped(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let batch = validate_batch(Vec::new());
        assert!(batch.records.is_empty());
        assert_eq!(batch.skipped(), 0);
    }
}
