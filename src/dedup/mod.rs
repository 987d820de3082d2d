//! Duplicate detection across sources and fetch cycles
//!
//! - Fingerprinting of normalized URL, category, creator and text prefix
//! - Grouping of a batch into duplicate clusters
//! - Deterministic primary election per cluster

pub mod fingerprint;
pub mod elector;
pub mod cluster;

pub use fingerprint::{fingerprint, Fingerprint, Fingerprinter};
pub use elector::{PlatformPriority, PrimaryElector};
pub use cluster::{
    assignments, build_clusters, primaries, ClusterAssignment, ClusterBuilder, DuplicateCluster,
};
