//! Domain model for A-SMGCS surveillance performance evaluation.
//!
//! This crate holds everything downstream of record interpretation that
//! does not depend on the pipeline's stage sequencing: sensor/message
//! classification types, WGS-84 geodesy, the aerodrome surface model,
//! the Track/TrackCollection/TrackCollectionSet ownership hierarchy,
//! traffic-period overlap algebra, and the per-area metric counters.

pub mod aerodrome;
pub mod area;
pub mod config;
pub mod counters;
pub mod error;
pub mod geo;
pub mod stats;
pub mod target_report;
pub mod traffic;
pub mod track;
pub mod types;

pub use error::{CoreError, CoreErrorKind, Result};
pub use target_report::TargetReport;
