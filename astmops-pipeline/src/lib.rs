//! Surveillance Performance Evaluation Pipeline
//!
//! This crate implements the six-stage pipeline that turns decoded ASTERIX
//! records into per-area surveillance performance counters:
//!
//! - Stage A ([`stage_a`]) classifies, schema-validates, and timestamps raw
//!   records, correcting for midnight rollover.
//! - Stage B ([`stage_b`]) extracts Target Reports in local ENU meters.
//! - Stage C ([`stage_c`]) tags each report with the aerodrome area it falls
//!   within.
//! - Stage D ([`stage_d`]) groups reports into per-system, per-track-number
//!   Tracks.
//! - Stage E ([`stage_e`]) associates test-system tracks (SMR, MLAT) to
//!   reference tracks (ADS-B, DGPS) sharing a real-world target.
//! - Stage F ([`stage_f`]) scores every associated set against ED-116/ED-117
//!   metrics.
//!
//! [`pipeline::Evaluator`] wires all six stages into a single pass.

pub mod pipeline;
pub mod stage_a;
pub mod stage_b;
pub mod stage_c;
pub mod stage_d;
pub mod stage_e;
pub mod stage_f;

pub use pipeline::Evaluator;
pub use stage_f::EvaluationResult;
