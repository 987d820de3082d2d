//! Content records harvested from source platforms
//!
//! Holds the typed record model and the boundary validation that turns
//! untrusted ingestion output into records the rest of the pipeline trusts.

pub mod models;
pub mod validation;

pub use models::{ContentRecord, IncomingRecord, SelectionCandidate, SourceCategory};
pub use validation::{validate_batch, validate_record, ValidatedBatch};
