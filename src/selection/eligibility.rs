//! Eligibility filter feeding the quota selector
//!
//! Each rule is a small predicate; the filter keeps a record only when every
//! rule accepts it. New rules plug in through [`EligibilityFilter::with_rule`].

use crate::content::{ContentRecord, SelectionCandidate, SourceCategory};
use crate::metrics::METRICS;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Inputs shared by all rules during one filter pass
#[derive(Debug, Clone, Copy)]
pub struct EligibilityContext {
    pub now: DateTime<Utc>,
}

impl EligibilityContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// A single eligibility predicate
pub trait EligibilityRule: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn accepts(&self, record: &ContentRecord, ctx: &EligibilityContext) -> bool;
}

/// Relevance score at or above a threshold
#[derive(Debug, Clone, Copy)]
pub struct RelevanceThreshold(pub f64);

impl EligibilityRule for RelevanceThreshold {
    fn name(&self) -> &'static str {
        "relevance_threshold"
    }

    fn accepts(&self, record: &ContentRecord, _ctx: &EligibilityContext) -> bool {
        record.relevance_score >= self.0
    }
}

/// Published no earlier than `now - window`.
///
/// A window reaching past the representable time range accepts everything.
#[derive(Debug, Clone, Copy)]
pub struct RecencyWindow(pub Duration);

impl EligibilityRule for RecencyWindow {
    fn name(&self) -> &'static str {
        "recency_window"
    }

    fn accepts(&self, record: &ContentRecord, ctx: &EligibilityContext) -> bool {
        match ctx.now.checked_sub_signed(self.0) {
            Some(cutoff) => record.published_at >= cutoff,
            None => true,
        }
    }
}

/// Restrict to a set of source categories
#[derive(Debug, Clone)]
pub struct CategoryAllowList(pub HashSet<SourceCategory>);

impl EligibilityRule for CategoryAllowList {
    fn name(&self) -> &'static str {
        "category_allow_list"
    }

    fn accepts(&self, record: &ContentRecord, _ctx: &EligibilityContext) -> bool {
        self.0.contains(&record.source_category)
    }
}

/// Conjunction of eligibility rules
#[derive(Default)]
pub struct EligibilityFilter {
    rules: Vec<Box<dyn EligibilityRule>>,
}

impl EligibilityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relevance threshold plus recency window
    pub fn standard(relevance_threshold: f64, recency_window: Duration) -> Self {
        Self::new()
            .with_rule(RelevanceThreshold(relevance_threshold))
            .with_rule(RecencyWindow(recency_window))
    }

    pub fn with_rule(mut self, rule: impl EligibilityRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn is_eligible(&self, record: &ContentRecord, ctx: &EligibilityContext) -> bool {
        self.rules.iter().all(|rule| {
            let accepted = rule.accepts(record, ctx);
            if !accepted {
                debug!("Record {} rejected by {}", record.id, rule.name());
            }
            accepted
        })
    }

    /// Candidates for selection, in input order.
    ///
    /// Callers pass primaries only.
    pub fn apply<'a, I>(&self, primaries: I, ctx: &EligibilityContext) -> Vec<SelectionCandidate>
    where
        I: IntoIterator<Item = &'a ContentRecord>,
    {
        let candidates: Vec<SelectionCandidate> = primaries
            .into_iter()
            .filter(|record| self.is_eligible(record, ctx))
            .cloned()
            .map(SelectionCandidate::new)
            .collect();

        METRICS.candidates_eligible.inc_by(candidates.len() as f64);
        candidates
    }
}
