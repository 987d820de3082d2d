//! Digest curation for creator content
//!
//! Collapses near-duplicate records harvested from several platforms, picks a
//! bounded and diverse selection for a periodic digest, and trims generated
//! headline text to a fixed word budget.

pub mod assembly;
pub mod config;
pub mod content;
pub mod dedup;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod selection;
pub mod session;

pub use error::{DigestError, Result};

pub mod prelude {
    pub use crate::assembly::{
        assemble, parse_or_extract, HeadlineGenerator, TextItem, WordBudgetAssembler,
        WordBudgetConfig,
    };
    pub use crate::config::Config;
    pub use crate::content::{
        validate_batch, ContentRecord, IncomingRecord, SelectionCandidate, SourceCategory,
    };
    pub use crate::dedup::{
        build_clusters, ClusterBuilder, DuplicateCluster, Fingerprinter, PlatformPriority,
        PrimaryElector,
    };
    pub use crate::error::{DigestError, Result};
    pub use crate::pipeline::{DigestPipeline, DigestRun};
    pub use crate::selection::{
        select, CategoryQuota, EligibilityContext, EligibilityFilter, QuotaSelector,
        ShortfallPolicy,
    };
    pub use crate::session::DigestSession;
}
