//! Concrete ASTERIX field schemas and result-document naming tables.
//!
//! This is the "catalogue" layer: the generic schema-checking machinery
//! lives in `asterix_record`, and the domain types it is checked against
//! live in `astmops_core`; this crate owns the specific mandatory/
//! disjunctive field lists per record type and the metric-key naming used
//! when rendering results.

pub mod metrics;
pub mod schema;

pub use metrics::MetricKey;
