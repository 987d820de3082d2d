//! Per-run digest session
//!
//! Tracks which artifacts (URLs, images, ...) a single digest run has already
//! used, keyed by domain. A session lives exactly as long as one run, so
//! concurrent runs never see each other's state.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Artifact domain for canonical content URLs
pub const CONTENT_URL_DOMAIN: &str = "content-url";

#[derive(Debug, Clone)]
pub struct DigestSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    used_artifacts: HashMap<String, HashSet<String>>,
}

impl DigestSession {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    /// Session pinned to a fixed start time, used as "now" for recency checks
    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            used_artifacts: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Mark an artifact as used. Returns false if this session already used it.
    pub fn claim(&mut self, domain: &str, artifact: &str) -> bool {
        self.used_artifacts
            .entry(domain.to_string())
            .or_default()
            .insert(artifact.to_string())
    }

    pub fn is_claimed(&self, domain: &str, artifact: &str) -> bool {
        self.used_artifacts
            .get(domain)
            .is_some_and(|used| used.contains(artifact))
    }

    pub fn claimed_count(&self, domain: &str) -> usize {
        self.used_artifacts.get(domain).map_or(0, HashSet::len)
    }
}

impl Default for DigestSession {
    fn default() -> Self {
        Self::new()
    }
}
