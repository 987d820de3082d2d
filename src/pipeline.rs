//! Digest pipeline for one topic run
//!
//! validate -> cluster -> eligibility -> select -> generate -> assemble.
//! Every stage except generation is synchronous and pure; generation calls
//! go out concurrently and come back in selection order.

use crate::assembly::{
    parse_or_extract, Assembly, ExcerptHeadlineGenerator, HeadlineGenerator, TextItem,
    WordBudgetAssembler,
};
use crate::config::Config;
use crate::content::{validate_batch, ContentRecord, IncomingRecord, SelectionCandidate};
use crate::dedup::fingerprint::normalize_url;
use crate::dedup::{
    assignments, primaries, ClusterAssignment, ClusterBuilder, DuplicateCluster, Fingerprinter,
    PrimaryElector,
};
use crate::error::{DigestError, Result};
use crate::metrics::METRICS;
use crate::selection::{
    CategoryQuota, EligibilityContext, EligibilityFilter, QuotaSelector, SelectionOutcome,
};
use crate::session::{DigestSession, CONTENT_URL_DOMAIN};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of one digest run
#[derive(Debug)]
pub struct DigestRun {
    pub session_id: Uuid,
    pub clusters: Vec<DuplicateCluster>,
    pub assignments: Vec<ClusterAssignment>,
    pub rejected: Vec<DigestError>,
    pub selection: SelectionOutcome,
    pub headlines: Assembly,
    /// Selected ids whose headline generation failed
    pub generation_failures: Vec<String>,
}

impl DigestRun {
    pub fn skipped_records(&self) -> usize {
        self.rejected.len()
    }
}

/// Digest pipeline
pub struct DigestPipeline {
    cluster_builder: ClusterBuilder,
    eligibility: EligibilityFilter,
    selector: QuotaSelector,
    quotas: Vec<CategoryQuota>,
    total_limit: usize,
    assembler: WordBudgetAssembler,
    generator: Arc<dyn HeadlineGenerator>,
}

impl DigestPipeline {
    /// Create a pipeline with a custom headline generator
    pub fn new(config: &Config, generator: Arc<dyn HeadlineGenerator>) -> Self {
        let cluster_builder = ClusterBuilder::new(
            Fingerprinter::new(config.dedup.text_prefix_len),
            PrimaryElector::new(config.dedup.platform_priority.clone()),
        );

        Self {
            cluster_builder,
            eligibility: EligibilityFilter::standard(
                config.selection.relevance_threshold,
                config.selection.recency_window(),
            ),
            selector: QuotaSelector::new(config.selection.shortfall_policy),
            quotas: config.selection.quotas.clone(),
            total_limit: config.selection.total_limit,
            assembler: WordBudgetAssembler::new(config.assembly.clone()),
            generator,
        }
    }

    /// Create with the excerpt-based generator
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Arc::new(ExcerptHeadlineGenerator))
    }

    /// Replace the eligibility filter
    pub fn with_eligibility(mut self, eligibility: EligibilityFilter) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn cluster_builder(&self) -> &ClusterBuilder {
        &self.cluster_builder
    }

    /// Eligible primaries not yet used by this session
    pub fn candidates(
        &self,
        records: &[ContentRecord],
        clusters: &[DuplicateCluster],
        session: &DigestSession,
    ) -> Vec<SelectionCandidate> {
        let ctx = EligibilityContext::at(session.start_time());
        let mut candidates = self.eligibility.apply(primaries(records, clusters), &ctx);

        candidates.retain(|c| {
            let url = normalize_url(&c.record.canonical_url);
            let fresh = !session.is_claimed(CONTENT_URL_DOMAIN, &url);
            if !fresh {
                debug!("Candidate {} already used in session {}", c.id(), session.id());
            }
            fresh
        });
        candidates
    }

    /// Run the full pipeline over one batch
    pub async fn run(
        &self,
        batch: Vec<IncomingRecord>,
        session: &mut DigestSession,
    ) -> Result<DigestRun> {
        let result = self.run_inner(batch, session).await;
        METRICS.record_run(result.is_ok());
        result
    }

    async fn run_inner(
        &self,
        batch: Vec<IncomingRecord>,
        session: &mut DigestSession,
    ) -> Result<DigestRun> {
        info!("Starting digest run in session {}", session.id());

        let validated = validate_batch(batch);
        let clusters = self.cluster_builder.build(&validated.records);
        let candidates = self.candidates(&validated.records, &clusters, session);

        let selection = self
            .selector
            .select_with_trace(&candidates, &self.quotas, self.total_limit);

        let (items, generation_failures) = self.generate_headlines(&selection.items).await;
        if !selection.items.is_empty() && generation_failures.len() == selection.items.len() {
            return Err(DigestError::Generation(format!(
                "no headlines generated for {} selected items",
                selection.items.len()
            )));
        }

        // Failed runs leave the session untouched
        for item in &selection.items {
            session.claim(CONTENT_URL_DOMAIN, &normalize_url(&item.record.canonical_url));
        }

        let headlines = self.assembler.assemble_detailed(&items);

        info!(
            "Digest run complete: records={}, skipped={}, clusters={}, candidates={}, selected={}, headlines={}",
            validated.records.len(),
            validated.skipped(),
            clusters.len(),
            candidates.len(),
            selection.items.len(),
            headlines.items.len()
        );

        Ok(DigestRun {
            session_id: session.id(),
            assignments: assignments(&clusters),
            clusters,
            rejected: validated.rejected,
            selection,
            headlines,
            generation_failures,
        })
    }

    /// Headline items in selection order, plus ids that failed
    async fn generate_headlines(
        &self,
        selected: &[SelectionCandidate],
    ) -> (Vec<TextItem>, Vec<String>) {
        let payloads = join_all(selected.iter().map(|c| self.generator.generate(c))).await;

        let mut items = Vec::new();
        let mut failures = Vec::new();
        for (candidate, payload) in selected.iter().zip(payloads) {
            match payload {
                Ok(raw) => items.extend(
                    parse_or_extract(&raw)
                        .into_iter()
                        .map(|headline| TextItem::new(headline).with_source(candidate.id())),
                ),
                Err(e) => {
                    warn!("Headline generation failed for {}: {}", candidate.id(), e);
                    failures.push(candidate.id().to_string());
                }
            }
        }
        (items, failures)
    }
}
