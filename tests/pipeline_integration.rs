//! End-to-end digest runs through the public API

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use digest_curator::assembly::GenerationError;
use digest_curator::prelude::*;
use std::sync::Arc;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn incoming(
    id: &str,
    category: SourceCategory,
    url: &str,
    relevance: f64,
    age_hours: i64,
) -> IncomingRecord {
    IncomingRecord {
        id: Some(id.to_string()),
        source_category: Some(category),
        creator_id: Some("creator-7".to_string()),
        title: Some(format!("Story {}", id)),
        description_excerpt: Some("A short description".to_string()),
        canonical_url: Some(url.to_string()),
        published_at: Some(now() - Duration::hours(age_hours)),
        engagement_score: Some(12.0),
        relevance_score: Some(relevance),
        ..Default::default()
    }
}

fn test_config() -> Config {
    Config::from_toml_str(
        r#"
        [selection]
        relevance_threshold = 50
        recency_window_hours = 24
        total_limit = 3
        quotas = [
            { category = "long-form-video", target_count = 1 },
            { category = "syndicated-feed", target_count = 1 },
        ]

        [assembly]
        word_budget = 7
        max_items = 5
        "#,
    )
    .unwrap()
}

/// Returns two bullet lines as free text, exercising the fallback parser
struct BulletGenerator;

#[async_trait]
impl HeadlineGenerator for BulletGenerator {
    async fn generate(&self, candidate: &SelectionCandidate) -> std::result::Result<String, GenerationError> {
        Ok(format!("- {} lead\n- {} detail", candidate.id(), candidate.id()))
    }
}

#[tokio::test]
async fn test_full_run() {
    let batch = vec![
        incoming("video-a", SourceCategory::LongFormVideo, "https://v.example/a", 80.0, 2),
        IncomingRecord {
            title: Some("Story video-a".to_string()),
            ..incoming("video-a-dup", SourceCategory::LongFormVideo, "https://v.example/a?ref=rss", 80.0, 2)
        },
        incoming("feed-b", SourceCategory::SyndicatedFeed, "https://f.example/b", 70.0, 3),
        incoming("feed-old", SourceCategory::SyndicatedFeed, "https://f.example/old", 99.0, 48),
        incoming("post-low", SourceCategory::ShortFormPost, "https://s.example/low", 10.0, 1),
        incoming("post-c", SourceCategory::ShortFormPost, "https://s.example/c", 65.0, 1),
        IncomingRecord {
            id: Some("broken".to_string()),
            ..Default::default()
        },
    ];

    let pipeline = DigestPipeline::new(&test_config(), Arc::new(BulletGenerator));
    let mut session = DigestSession::started_at(now());
    let run = pipeline.run(batch, &mut session).await.unwrap();

    assert_eq!(run.session_id, session.id());
    assert_eq!(run.skipped_records(), 1);
    assert_eq!(run.clusters.len(), 5);
    assert_eq!(run.assignments.len(), 6);
    assert_eq!(run.assignments.iter().filter(|a| a.is_primary).count(), 5);

    assert_eq!(run.selection.ids(), vec!["video-a", "feed-b", "post-c"]);
    assert_eq!(run.selection.fill_count, 1);

    let texts: Vec<&str> = run.headlines.items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["video-a lead", "video-a detail", "feed-b lead", "feed-b..."]);
    assert!(run.headlines.truncated);
    assert_eq!(run.headlines.words_used, 7);
    assert!(run.generation_failures.is_empty());
}

#[tokio::test]
async fn test_concurrent_runs_are_identical() {
    let batch: Vec<IncomingRecord> = (0..20)
        .map(|i| {
            let category = SourceCategory::ALL[i % SourceCategory::ALL.len()];
            incoming(
                &format!("item-{:02}", i),
                category,
                &format!("https://example.com/{}", i % 7),
                50.0 + (i % 5) as f64 * 10.0,
                (i % 12) as i64,
            )
        })
        .collect();

    let pipeline = Arc::new(DigestPipeline::from_config(&test_config()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let batch = batch.clone();
            tokio::spawn(async move {
                let mut session = DigestSession::started_at(now());
                let run = pipeline.run(batch, &mut session).await.unwrap();
                let ids: Vec<String> = run.selection.ids().iter().map(|s| s.to_string()).collect();
                let texts: Vec<String> = run.headlines.items.into_iter().map(|i| i.text).collect();
                (ids, texts)
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    assert!(!results[0].0.is_empty());
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_prelude_exports() {
    let _: Option<DigestPipeline> = None;
    let _: Option<ClusterBuilder> = None;
    let _: Option<QuotaSelector> = None;
    let _: Option<WordBudgetAssembler> = None;
    let _: Option<DigestSession> = None;
    let _: Option<EligibilityFilter> = None;
}
