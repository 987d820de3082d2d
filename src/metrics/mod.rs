//! Metrics collection for digest runs

use prometheus::{
    Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry,
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Validation metrics
    pub records_accepted: Counter,
    pub records_rejected: Counter,

    // Dedup metrics
    pub clusters_built: Counter,
    pub duplicates_collapsed: Counter,

    // Selection metrics
    pub candidates_eligible: Counter,
    pub items_selected: CounterVec,

    // Assembly metrics
    pub assembly_truncations: Counter,
    pub assembly_words: Histogram,
    pub headline_parse_fallbacks: Counter,

    pub digest_runs: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let records_accepted = register_counter_with_registry!(
            Opts::new("digest_records_accepted_total", "Records that passed validation"),
            registry
        )?;

        let records_rejected = register_counter_with_registry!(
            Opts::new("digest_records_rejected_total", "Records skipped as invalid"),
            registry
        )?;

        let clusters_built = register_counter_with_registry!(
            Opts::new("digest_clusters_built_total", "Duplicate clusters computed"),
            registry
        )?;

        let duplicates_collapsed = register_counter_with_registry!(
            Opts::new(
                "digest_duplicates_collapsed_total",
                "Non-primary records collapsed into a cluster"
            ),
            registry
        )?;

        let candidates_eligible = register_counter_with_registry!(
            Opts::new(
                "digest_candidates_eligible_total",
                "Primary records that passed the eligibility filter"
            ),
            registry
        )?;

        let items_selected = register_counter_vec_with_registry!(
            Opts::new("digest_items_selected_total", "Items selected per phase"),
            &["phase"],
            registry
        )?;

        let assembly_truncations = register_counter_with_registry!(
            Opts::new(
                "digest_assembly_truncations_total",
                "Text items truncated at the word budget boundary"
            ),
            registry
        )?;

        let assembly_words = register_histogram_with_registry!(
            HistogramOpts::new("digest_assembly_words", "Words used per assembled section")
                .buckets(vec![10.0, 25.0, 50.0, 100.0, 200.0, 400.0, 800.0]),
            registry
        )?;

        let headline_parse_fallbacks = register_counter_with_registry!(
            Opts::new(
                "digest_headline_parse_fallbacks_total",
                "Generated headline payloads that needed the line-based fallback"
            ),
            registry
        )?;

        let digest_runs = register_counter_vec_with_registry!(
            Opts::new("digest_runs_total", "Digest pipeline runs"),
            &["status"],
            registry
        )?;

        Ok(Self {
            registry,
            records_accepted,
            records_rejected,
            clusters_built,
            duplicates_collapsed,
            candidates_eligible,
            items_selected,
            assembly_truncations,
            assembly_words,
            headline_parse_fallbacks,
            digest_runs,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record the outcome of a clustering pass
    pub fn record_clustering(&self, records: usize, clusters: usize) {
        self.clusters_built.inc_by(clusters as f64);
        self.duplicates_collapsed
            .inc_by(records.saturating_sub(clusters) as f64);
    }

    /// Record items selected by the quota and fill phases
    pub fn record_selection(&self, quota_items: usize, fill_items: usize) {
        self.items_selected
            .with_label_values(&["quota"])
            .inc_by(quota_items as f64);
        self.items_selected
            .with_label_values(&["fill"])
            .inc_by(fill_items as f64);
    }

    /// Record an assembled section
    pub fn record_assembly(&self, words_used: usize, truncated: bool) {
        self.assembly_words.observe(words_used as f64);
        if truncated {
            self.assembly_truncations.inc();
        }
    }

    /// Record a finished digest run
    pub fn record_run(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.digest_runs.with_label_values(&[status]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Render the global registry in Prometheus text format
pub fn render() -> String {
    METRICS.export_prometheus()
}
