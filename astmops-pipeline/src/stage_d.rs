//! Stage D — Track Builder: group Target Reports into per-sensor,
//! per-track-number Tracks and flush them into TrackCollections.

use std::collections::HashMap;

use astmops_core::target_report::TargetReport;
use astmops_core::track::{Track, TrackCollection};
use astmops_core::types::{SystemType, TrackNum};

#[derive(Default)]
pub struct TrackBuilder {
    open: HashMap<(SystemType, TrackNum), Track>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, report: TargetReport) {
        let key = (report.system_type, report.track_number);
        self.open
            .entry(key)
            .or_insert_with(|| Track::new(report.system_type, report.track_number))
            .insert(report);
    }

    pub fn add_all(&mut self, reports: impl IntoIterator<Item = TargetReport>) {
        for report in reports {
            self.add(report);
        }
    }

    /// Flush every non-empty track into per-SystemType TrackCollections.
    pub fn finish(self) -> HashMap<SystemType, TrackCollection> {
        let mut collections: HashMap<SystemType, TrackCollection> = HashMap::new();
        for ((system, _), track) in self.open {
            if !track.is_empty() {
                collections.entry(system).or_default().insert(track);
            }
        }
        collections
    }
}
