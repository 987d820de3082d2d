//! Configuration for digest curation
//!
//! Loaded from an optional TOML file layered under `DIGEST__`-prefixed
//! environment variables, e.g. `DIGEST__SELECTION__TOTAL_LIMIT=12`.

use crate::assembly::WordBudgetConfig;
use crate::content::SourceCategory;
use crate::dedup::fingerprint::DEFAULT_TEXT_PREFIX_LEN;
use crate::dedup::PlatformPriority;
use crate::error::{DigestError, Result};
use crate::selection::{CategoryQuota, ShortfallPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on `recency_window_hours` (about a century)
pub const MAX_RECENCY_WINDOW_HOURS: u32 = 24 * 366 * 100;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub dedup: DedupConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub assembly: WordBudgetConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Duplicate detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Characters of normalized title/description entering the fingerprint
    #[serde(default = "default_text_prefix_len")]
    pub text_prefix_len: usize,

    /// Primary election order, highest priority first
    #[serde(default)]
    pub platform_priority: PlatformPriority,
}

fn default_text_prefix_len() -> usize {
    DEFAULT_TEXT_PREFIX_LEN
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            text_prefix_len: default_text_prefix_len(),
            platform_priority: PlatformPriority::default(),
        }
    }
}

/// Selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Minimum relevance score (0-100)
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f64,

    /// Recency window in hours
    #[serde(default = "default_recency_window_hours")]
    pub recency_window_hours: u32,

    /// Maximum items per digest
    #[serde(default = "default_total_limit")]
    pub total_limit: usize,

    /// Per-category targets, in priority order
    #[serde(default = "default_quotas")]
    pub quotas: Vec<CategoryQuota>,

    #[serde(default)]
    pub shortfall_policy: ShortfallPolicy,
}

fn default_relevance_threshold() -> f64 {
    60.0
}

fn default_recency_window_hours() -> u32 {
    168
}

fn default_total_limit() -> usize {
    8
}

fn default_quotas() -> Vec<CategoryQuota> {
    vec![
        CategoryQuota::new(SourceCategory::LongFormVideo, 2),
        CategoryQuota::new(SourceCategory::SyndicatedFeed, 2),
        CategoryQuota::new(SourceCategory::ShortFormPost, 2),
        CategoryQuota::new(SourceCategory::ProfessionalPost, 1),
    ]
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: default_relevance_threshold(),
            recency_window_hours: default_recency_window_hours(),
            total_limit: default_total_limit(),
            quotas: default_quotas(),
            shortfall_policy: ShortfallPolicy::default(),
        }
    }
}

impl SelectionConfig {
    pub fn recency_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.recency_window_hours))
    }
}

impl Config {
    /// Load from an optional file, then environment overrides
    pub fn load(path: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!("Loading configuration from {}", path);
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let config: Config = builder
            .add_source(
                config::Environment::with_prefix("DIGEST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text without consulting the environment
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        let threshold = self.selection.relevance_threshold;
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(DigestError::Configuration(format!(
                "relevance_threshold {} outside 0..=100",
                threshold
            )));
        }

        let window = self.selection.recency_window_hours;
        if window == 0 || window > MAX_RECENCY_WINDOW_HOURS {
            return Err(DigestError::Configuration(format!(
                "recency_window_hours {} outside 1..={}",
                window, MAX_RECENCY_WINDOW_HOURS
            )));
        }

        if self.dedup.text_prefix_len == 0 {
            return Err(DigestError::Configuration(
                "text_prefix_len must be positive".to_string(),
            ));
        }

        self.assembly.validate()?;

        if let Some(category) = self.dedup.platform_priority.first_repeated() {
            return Err(DigestError::Configuration(format!(
                "platform_priority lists {} more than once",
                category
            )));
        }

        Ok(())
    }
}
