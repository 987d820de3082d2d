//! Quota-based bounded selection
//!
//! Two phases:
//! 1. Quota pass: categories in the supplied order each take up to their
//!    target of best-ranked candidates. A short category keeps its shortfall.
//! 2. Fill pass: remaining slots up to the total limit go to the best
//!    remaining candidates of any category.
//!
//! Ranking: relevance desc, engagement desc, published_at desc, id asc.

use crate::content::{SelectionCandidate, SourceCategory};
use crate::metrics::METRICS;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};

/// Target count for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuota {
    pub category: SourceCategory,
    pub target_count: usize,
}

impl CategoryQuota {
    pub fn new(category: SourceCategory, target_count: usize) -> Self {
        Self {
            category,
            target_count,
        }
    }
}

/// What happens to slots a short category leaves open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Fill from the global pool by rank, regardless of category
    #[default]
    FillFromPool,
    /// Leave the slots empty; output may be shorter than the limit
    LeaveUnfilled,
}

/// Per-quota trace of the quota pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaTrace {
    pub category: SourceCategory,
    pub target: usize,
    pub available: usize,
    pub taken: usize,
}

impl QuotaTrace {
    pub fn shortfall(&self) -> usize {
        self.target.saturating_sub(self.taken)
    }
}

/// Selection plus how it was reached
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionOutcome {
    pub items: Vec<SelectionCandidate>,
    pub quota_trace: Vec<QuotaTrace>,
    pub fill_count: usize,
}

impl SelectionOutcome {
    pub fn quota_count(&self) -> usize {
        self.items.len() - self.fill_count
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.id()).collect()
    }
}

/// Ranking order shared by both phases; `Less` ranks first
pub fn rank_order(a: &SelectionCandidate, b: &SelectionCandidate) -> Ordering {
    let (a, b) = (&a.record, &b.record);
    b.relevance_score
        .total_cmp(&a.relevance_score)
        .then_with(|| b.engagement_score.total_cmp(&a.engagement_score))
        .then_with(|| b.published_at.cmp(&a.published_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Quota-based selector
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotaSelector {
    shortfall: ShortfallPolicy,
}

impl QuotaSelector {
    pub fn new(shortfall: ShortfallPolicy) -> Self {
        Self { shortfall }
    }

    pub fn shortfall_policy(&self) -> ShortfallPolicy {
        self.shortfall
    }

    /// Bounded, ordered selection
    pub fn select(
        &self,
        candidates: &[SelectionCandidate],
        quotas: &[CategoryQuota],
        total_limit: usize,
    ) -> Vec<SelectionCandidate> {
        self.select_with_trace(candidates, quotas, total_limit).items
    }

    /// Bounded, ordered selection with per-phase trace
    pub fn select_with_trace(
        &self,
        candidates: &[SelectionCandidate],
        quotas: &[CategoryQuota],
        total_limit: usize,
    ) -> SelectionOutcome {
        let mut outcome = SelectionOutcome::default();
        if total_limit == 0 || candidates.is_empty() {
            return outcome;
        }

        let mut ranked: Vec<&SelectionCandidate> = candidates.iter().collect();
        ranked.sort_by(|a, b| rank_order(a, b));

        let mut selected: HashSet<&str> = HashSet::new();

        for quota in quotas {
            let mut seen: HashSet<&str> = HashSet::new();
            let available: Vec<&SelectionCandidate> = ranked
                .iter()
                .copied()
                .filter(|c| c.category() == quota.category && !selected.contains(c.id()))
                .filter(|&c| seen.insert(c.id()))
                .collect();

            let room = total_limit - outcome.items.len();
            let want = quota.target_count.min(room);
            let mut take = 0;

            for &candidate in &available {
                if take >= want {
                    break;
                }
                if selected.insert(candidate.id()) {
                    outcome.items.push(candidate.clone());
                    take += 1;
                }
            }

            if take < quota.target_count {
                debug!(
                    "Quota for {} short: target={}, available={}, taken={}",
                    quota.category,
                    quota.target_count,
                    available.len(),
                    take
                );
            }

            outcome.quota_trace.push(QuotaTrace {
                category: quota.category,
                target: quota.target_count,
                available: available.len(),
                taken: take,
            });
        }

        if self.shortfall == ShortfallPolicy::FillFromPool {
            for &candidate in &ranked {
                if outcome.items.len() >= total_limit {
                    break;
                }
                if selected.insert(candidate.id()) {
                    outcome.items.push(candidate.clone());
                    outcome.fill_count += 1;
                }
            }
        }

        METRICS.record_selection(outcome.quota_count(), outcome.fill_count);
        info!(
            "Selected {} of {} candidates (quota={}, fill={}, limit={})",
            outcome.items.len(),
            candidates.len(),
            outcome.quota_count(),
            outcome.fill_count,
            total_limit
        );

        outcome
    }
}

/// Select with the default shortfall policy
pub fn select(
    candidates: &[SelectionCandidate],
    quotas: &[CategoryQuota],
    total_limit: usize,
) -> Vec<SelectionCandidate> {
    QuotaSelector::default().select(candidates, quotas, total_limit)
}
