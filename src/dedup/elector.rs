//! Primary election within a duplicate cluster

use crate::content::{ContentRecord, SourceCategory};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Platform priority order, highest first
///
/// Categories missing from the list rank below every listed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformPriority(Vec<SourceCategory>);

impl Default for PlatformPriority {
    fn default() -> Self {
        Self(vec![
            SourceCategory::LongFormVideo,
            SourceCategory::SyndicatedFeed,
            SourceCategory::ShortFormPost,
            SourceCategory::ProfessionalPost,
            SourceCategory::GenericWeb,
        ])
    }
}

impl PlatformPriority {
    pub fn new(order: Vec<SourceCategory>) -> Self {
        Self(order)
    }

    pub fn order(&self) -> &[SourceCategory] {
        &self.0
    }

    /// Larger is better
    pub fn rank(&self, category: SourceCategory) -> usize {
        self.0
            .iter()
            .position(|c| *c == category)
            .map(|pos| self.0.len() - pos)
            .unwrap_or(0)
    }

    /// First category listed more than once, if any
    pub fn first_repeated(&self) -> Option<SourceCategory> {
        self.0
            .iter()
            .enumerate()
            .find(|(i, c)| self.0[..*i].contains(c))
            .map(|(_, c)| *c)
    }
}

/// Elects the canonical record of a cluster
#[derive(Debug, Clone, Default)]
pub struct PrimaryElector {
    priority: PlatformPriority,
}

impl PrimaryElector {
    pub fn new(priority: PlatformPriority) -> Self {
        Self { priority }
    }

    pub fn priority(&self) -> &PlatformPriority {
        &self.priority
    }

    /// Total order where `Less` means `a` is the better primary.
    ///
    /// Platform priority, then engagement, then recency, then smallest id.
    pub fn compare(&self, a: &ContentRecord, b: &ContentRecord) -> Ordering {
        self.priority
            .rank(b.source_category)
            .cmp(&self.priority.rank(a.source_category))
            .then_with(|| b.engagement_score.total_cmp(&a.engagement_score))
            .then_with(|| b.published_at.cmp(&a.published_at))
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Id of the elected primary; `None` only for an empty slice
    pub fn elect<'a>(&self, members: &[&'a ContentRecord]) -> Option<&'a str> {
        members
            .iter()
            .copied()
            .min_by(|a, b| self.compare(a, b))
            .map(|record| record.id.as_str())
    }
}
