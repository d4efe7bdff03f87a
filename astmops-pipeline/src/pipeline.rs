//! End-to-end orchestration: wires stages A through F into a single pass
//! over decoded ASTERIX records.

use std::collections::HashSet;

use asterix_record::Record;
use astmops_core::aerodrome::Aerodrome;
use astmops_core::config::Config;
use astmops_core::geo::GeoPos;
use astmops_core::track::{Track, TrackCollection};
use astmops_core::types::{ModeS, SystemType};

use crate::stage_a::RecordInterpreter;
use crate::stage_b::TargetReportExtractor;
use crate::stage_c::AerodromeLocator;
use crate::stage_d::TrackBuilder;
use crate::stage_e;
use crate::stage_f::{self, EvaluationResult};

/// Drives one evaluation run: every decoded record is classified (stage A),
/// extracted into a Target Report (stage B), located on the aerodrome
/// (stage C), and folded into per-system Tracks (stage D), before the
/// accumulated tracks are associated (stage E) and scored (stage F).
pub struct Evaluator<'a> {
    config: &'a Config,
    aerodrome: &'a Aerodrome,
    aerodrome_origin: GeoPos,
    excluded_addresses: HashSet<ModeS>,
    dgps_track: Option<Track>,
}

impl<'a> Evaluator<'a> {
    pub fn new(config: &'a Config, aerodrome: &'a Aerodrome, aerodrome_origin: GeoPos) -> Self {
        Self {
            config,
            aerodrome,
            aerodrome_origin,
            excluded_addresses: HashSet::new(),
            dgps_track: None,
        }
    }

    pub fn with_excluded_addresses(mut self, excluded_addresses: HashSet<ModeS>) -> Self {
        self.excluded_addresses = excluded_addresses;
        self
    }

    /// Inject the single DGPS-equipped ground vehicle's track, built from
    /// the DGPS reference file, as the reference collection for DGPS mode.
    pub fn with_dgps_track(mut self, track: Track) -> Self {
        self.dgps_track = Some(track);
        self
    }

    /// Run the full pipeline over `records` and return the resulting
    /// per-area counters.
    pub fn evaluate(&self, records: impl IntoIterator<Item = Record>) -> EvaluationResult {
        let mut interpreter = RecordInterpreter::new(self.config);
        let extractor = TargetReportExtractor::new(&self.excluded_addresses, self.aerodrome_origin);
        let locator = AerodromeLocator::new(self.aerodrome);
        let mut builder = TrackBuilder::new();

        let mut accepted = 0u64;
        let mut dropped = 0u64;

        for record in records {
            let Some(classified) = interpreter.process(record) else {
                dropped += 1;
                continue;
            };
            let Some(mut report) = extractor.extract(&classified) else {
                dropped += 1;
                continue;
            };
            locator.tag(&mut report);
            builder.add(report);
            accepted += 1;
        }
        log::info!("stage A/B/C: {accepted} target reports accepted, {dropped} records dropped");

        let mut collections = builder.finish();
        if let Some(track) = &self.dgps_track {
            let mut collection = TrackCollection::new();
            collection.insert(track.clone());
            collections.insert(SystemType::Dgps, collection);
        }
        let sets = stage_e::associate(&collections);
        log::info!("stage E: {} track collection sets associated", sets.len());

        stage_f::evaluate(&sets, self.config)
    }
}
