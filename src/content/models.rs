//! Data models for harvested content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin kind of a content record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceCategory {
    LongFormVideo,
    ShortFormPost,
    ProfessionalPost,
    SyndicatedFeed,
    GenericWeb,
}

impl SourceCategory {
    pub const ALL: [SourceCategory; 5] = [
        SourceCategory::LongFormVideo,
        SourceCategory::ShortFormPost,
        SourceCategory::ProfessionalPost,
        SourceCategory::SyndicatedFeed,
        SourceCategory::GenericWeb,
    ];

    /// Stable wire name, also used as fingerprint input
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::LongFormVideo => "long-form-video",
            SourceCategory::ShortFormPost => "short-form-post",
            SourceCategory::ProfessionalPost => "professional-post",
            SourceCategory::SyndicatedFeed => "syndicated-feed",
            SourceCategory::GenericWeb => "generic-web",
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record as delivered by the ingestion collaborator, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source_category: Option<SourceCategory>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description_excerpt: Option<String>,
    #[serde(default)]
    pub body_excerpt: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

/// Validated content record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    pub source_category: SourceCategory,
    pub creator_id: String,
    pub title: String,
    pub description_excerpt: String,
    pub body_excerpt: String,
    pub canonical_url: String,
    pub published_at: DateTime<Utc>,
    /// Weighted views/likes/comments, never negative
    pub engagement_score: f64,
    /// Topic fit in 0..=100
    pub relevance_score: f64,
}

impl ContentRecord {
    /// Create a record with empty text fields and zero scores
    pub fn new(
        id: impl Into<String>,
        source_category: SourceCategory,
        creator_id: impl Into<String>,
        canonical_url: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            source_category,
            creator_id: creator_id.into(),
            title: String::new(),
            description_excerpt: String::new(),
            body_excerpt: String::new(),
            canonical_url: canonical_url.into(),
            published_at,
            engagement_score: 0.0,
            relevance_score: 0.0,
        }
    }

    pub fn with_text(
        mut self,
        title: impl Into<String>,
        description_excerpt: impl Into<String>,
    ) -> Self {
        self.title = title.into();
        self.description_excerpt = description_excerpt.into();
        self
    }

    pub fn with_body(mut self, body_excerpt: impl Into<String>) -> Self {
        self.body_excerpt = body_excerpt.into();
        self
    }

    pub fn with_scores(mut self, engagement_score: f64, relevance_score: f64) -> Self {
        self.engagement_score = engagement_score;
        self.relevance_score = relevance_score;
        self
    }
}

/// Primary record that passed the eligibility filter for one digest run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionCandidate {
    pub record: ContentRecord,
}

impl SelectionCandidate {
    pub fn new(record: ContentRecord) -> Self {
        Self { record }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn category(&self) -> SourceCategory {
        self.record.source_category
    }
}

impl From<ContentRecord> for SelectionCandidate {
    fn from(record: ContentRecord) -> Self {
        Self::new(record)
    }
}
