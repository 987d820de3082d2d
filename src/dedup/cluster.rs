//! Duplicate cluster construction
//!
//! Groups a batch by fingerprint and elects one primary per group. Clusters
//! are recomputed from scratch for every batch; persisting the resulting
//! assignments is the caller's job.

use super::elector::PrimaryElector;
use super::fingerprint::{Fingerprint, Fingerprinter};
use crate::content::ContentRecord;
use crate::metrics::METRICS;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Records sharing one fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub fingerprint: Fingerprint,
    /// Member ids in input order, never empty
    pub member_ids: Vec<String>,
    /// Always one of `member_ids`
    pub primary_id: String,
}

impl DuplicateCluster {
    pub fn cluster_id(&self) -> String {
        self.fingerprint.to_hex()
    }

    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.member_ids.iter().any(|m| m == id)
    }
}

/// Per-record view handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAssignment {
    pub record_id: String,
    pub cluster_id: String,
    pub is_primary: bool,
}

/// Builds duplicate clusters for a batch
#[derive(Debug, Clone, Default)]
pub struct ClusterBuilder {
    fingerprinter: Fingerprinter,
    elector: PrimaryElector,
}

impl ClusterBuilder {
    pub fn new(fingerprinter: Fingerprinter, elector: PrimaryElector) -> Self {
        Self {
            fingerprinter,
            elector,
        }
    }

    pub fn fingerprinter(&self) -> &Fingerprinter {
        &self.fingerprinter
    }

    pub fn elector(&self) -> &PrimaryElector {
        &self.elector
    }

    /// One cluster per distinct fingerprint, in order of first appearance
    pub fn build(&self, records: &[ContentRecord]) -> Vec<DuplicateCluster> {
        let mut groups: IndexMap<Fingerprint, Vec<&ContentRecord>> = IndexMap::new();
        for record in records {
            groups
                .entry(self.fingerprinter.fingerprint(record))
                .or_default()
                .push(record);
        }

        let clusters: Vec<DuplicateCluster> = groups
            .into_iter()
            .filter_map(|(fingerprint, members)| {
                let primary_id = self.elector.elect(&members)?.to_string();
                Some(DuplicateCluster {
                    fingerprint,
                    member_ids: members.iter().map(|r| r.id.clone()).collect(),
                    primary_id,
                })
            })
            .collect();

        METRICS.record_clustering(records.len(), clusters.len());
        debug!(
            "Built {} clusters from {} records",
            clusters.len(),
            records.len()
        );

        clusters
    }
}

/// Build clusters with default fingerprinting and platform priority
pub fn build_clusters(records: &[ContentRecord]) -> Vec<DuplicateCluster> {
    ClusterBuilder::default().build(records)
}

/// Flatten clusters into one assignment per member
pub fn assignments(clusters: &[DuplicateCluster]) -> Vec<ClusterAssignment> {
    clusters
        .iter()
        .flat_map(|cluster| {
            let cluster_id = cluster.cluster_id();
            cluster.member_ids.iter().map(move |id| ClusterAssignment {
                record_id: id.clone(),
                cluster_id: cluster_id.clone(),
                is_primary: *id == cluster.primary_id,
            })
        })
        .collect()
}

/// Primary records in input order
pub fn primaries<'a>(
    records: &'a [ContentRecord],
    clusters: &[DuplicateCluster],
) -> Vec<&'a ContentRecord> {
    let primary_ids: HashSet<&str> = clusters.iter().map(|c| c.primary_id.as_str()).collect();
    records
        .iter()
        .filter(|r| primary_ids.contains(r.id.as_str()))
        .collect()
}
