//! Curated selection for a digest run
//!
//! Primaries pass through the eligibility filter and then the quota-based
//! selector, which produces the bounded, ordered list of items to publish.

pub mod eligibility;
pub mod quota;

pub use eligibility::{
    CategoryAllowList, EligibilityContext, EligibilityFilter, EligibilityRule, RecencyWindow,
    RelevanceThreshold,
};
pub use quota::{
    rank_order, select, CategoryQuota, QuotaSelector, QuotaTrace, SelectionOutcome,
    ShortfallPolicy,
};
