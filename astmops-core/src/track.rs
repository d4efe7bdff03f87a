//! Track assembly: a `Track` owns its `TargetReport`s, a `TrackCollection`
//! owns its `Track`s, and a `TrackCollectionSet` owns one reference
//! collection plus the per-system test collections matched to it. Nothing
//! here ever holds a `Track` by reference — the match graph refers to
//! tracks by `(SystemType, TrackNum)`.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::area::{Area, NamedArea};
use crate::geo::Enu;
use crate::types::{ModeS, SystemType, TrackNum};
use crate::TargetReport;

/// One sensor's reports for one track number, ordered by timestamp.
#[derive(Debug, Clone)]
pub struct Track {
    pub system_type: SystemType,
    pub track_number: TrackNum,
    reports: BTreeMap<DateTime<Utc>, Vec<TargetReport>>,
    mode_s: Option<ModeS>,
    nareas: Vec<NamedArea>,
}

impl Track {
    pub fn new(system_type: SystemType, track_number: TrackNum) -> Self {
        Self {
            system_type,
            track_number,
            reports: BTreeMap::new(),
            mode_s: None,
            nareas: Vec::new(),
        }
    }

    /// Insert a report. Ignored (with no effect) if it belongs to a
    /// different (system_type, track_number).
    pub fn insert(&mut self, report: TargetReport) {
        if report.system_type != self.system_type || report.track_number != self.track_number {
            return;
        }
        if self.mode_s.is_none() {
            self.mode_s = report.mode_s;
        }
        if !self.nareas.iter().any(|n| *n == report.narea) {
            self.nareas.push(report.narea.clone());
        }
        self.reports.entry(report.timestamp).or_default().push(report);
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.values().map(|v| v.len()).sum()
    }

    pub fn mode_s(&self) -> Option<ModeS> {
        self.mode_s
    }

    pub fn nareas(&self) -> &[NamedArea] {
        &self.nareas
    }

    pub fn begin(&self) -> Option<DateTime<Utc>> {
        self.reports.keys().next().copied()
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.reports.keys().next_back().copied()
    }

    pub fn duration_secs(&self) -> f64 {
        match (self.begin(), self.end()) {
            (Some(b), Some(e)) => (e - b).num_milliseconds() as f64 / 1000.0,
            _ => 0.0,
        }
    }

    /// Reports in timestamp order (ties broken arbitrarily among
    /// simultaneous reports).
    pub fn reports(&self) -> impl Iterator<Item = &TargetReport> {
        self.reports.values().flatten()
    }

    /// The single report recorded exactly at `t`, if any (first one, if
    /// more than one share the timestamp).
    pub fn at(&self, t: DateTime<Utc>) -> Option<&TargetReport> {
        self.reports.get(&t).and_then(|v| v.first())
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.reports.keys().copied().collect()
    }

    /// The samples strictly bracketing `t` (nearest before/at, nearest
    /// after), used by resampling and identification-probability bracket
    /// lookups.
    pub fn bracket(&self, t: DateTime<Utc>) -> (Option<&TargetReport>, Option<&TargetReport>) {
        let before = self
            .reports
            .range(..=t)
            .next_back()
            .and_then(|(_, v)| v.first());
        let after = self.reports.range(t..).next().and_then(|(_, v)| v.first());
        (before, after)
    }
}

/// Non-empty time intersection test between two tracks.
pub fn have_time_intersection(a: &Track, b: &Track) -> bool {
    match (a.begin(), a.end(), b.begin(), b.end()) {
        (Some(ab), Some(ae), Some(bb), Some(be)) => ab <= be && bb <= ae,
        _ => false,
    }
}

/// The subset of `intersectee`'s reports whose timestamps lie within
/// `intersector`'s [begin, end] span, or `None` if that subset is empty.
pub fn intersect(intersectee: &Track, intersector: &Track) -> Option<Track> {
    let (begin, end) = (intersector.begin()?, intersector.end()?);
    let mut out = Track::new(intersectee.system_type, intersectee.track_number);
    for report in intersectee.reports() {
        if report.timestamp >= begin && report.timestamp <= end {
            out.insert(report.clone());
        }
    }
    (!out.is_empty()).then_some(out)
}

fn lerp(a: f64, b: f64, f: f64) -> f64 {
    a + (b - a) * f
}

/// Resample `track` at the given timestamps, linearly interpolating
/// position between the bracketing samples. Timestamps outside the track's
/// coverage, or with no bracketing pair, are skipped.
pub fn resample(track: &Track, timestamps: &[DateTime<Utc>]) -> Track {
    let mut out = Track::new(track.system_type, track.track_number);
    for &t in timestamps {
        if let Some(exact) = track.at(t) {
            out.insert(exact.clone());
            continue;
        }
        let (before, after) = track.bracket(t);
        if let (Some(b), Some(a)) = (before, after) {
            let span = (a.timestamp - b.timestamp).num_milliseconds() as f64;
            if span <= 0.0 {
                continue;
            }
            let f = (t - b.timestamp).num_milliseconds() as f64 / span;
            let mut sample = b.clone();
            sample.timestamp = t;
            let z = match (b.position.z, a.position.z) {
                (Some(bz), Some(az)) => Some(lerp(bz, az, f)),
                _ => None,
            };
            sample.position = Enu::new(
                lerp(b.position.x, a.position.x, f),
                lerp(b.position.y, a.position.y, f),
                z,
            );
            out.insert(sample);
        }
    }
    out
}

/// Smooth `track` by averaging each sample's (x, y) over a `tw`-wide window
/// centered on it.
pub fn average(track: &Track, tw: chrono::Duration) -> Track {
    let half = tw / 2;
    let samples: Vec<&TargetReport> = track.reports().collect();
    let mut out = Track::new(track.system_type, track.track_number);
    for sample in &samples {
        let window: Vec<&&TargetReport> = samples
            .iter()
            .filter(|s| (s.timestamp - sample.timestamp).num_milliseconds().abs() <= half.num_milliseconds())
            .collect();
        let n = window.len() as f64;
        let x = window.iter().map(|s| s.position.x).sum::<f64>() / n;
        let y = window.iter().map(|s| s.position.y).sum::<f64>() / n;
        let mut averaged = (*sample).clone();
        averaged.position.x = x;
        averaged.position.y = y;
        out.insert(averaged);
    }
    out
}

/// Whether to split a track at every area change or every named-area change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSplitMode {
    SplitByArea,
    SplitByNamedArea,
}

/// Split `track` into maximal contiguous subtracks of matching area.
pub fn split_track_by_area(track: &Track, mode: TrackSplitMode) -> Vec<Track> {
    let mut out = Vec::new();
    let mut current: Option<Track> = None;
    let mut current_key: Option<NamedArea> = None;

    let same = |a: &NamedArea, b: &NamedArea| match mode {
        TrackSplitMode::SplitByArea => a.area == b.area,
        TrackSplitMode::SplitByNamedArea => a == b,
    };

    for report in track.reports() {
        let changed = match &current_key {
            Some(key) => !same(key, &report.narea),
            None => true,
        };
        if changed {
            if let Some(t) = current.take() {
                out.push(t);
            }
            current = Some(Track::new(track.system_type, track.track_number));
            current_key = Some(report.narea.clone());
        }
        current.as_mut().unwrap().insert(report.clone());
    }
    if let Some(t) = current {
        out.push(t);
    }
    out
}

/// An ordered set of tracks sharing one system type, indexed by begin time.
#[derive(Debug, Clone, Default)]
pub struct TrackCollection {
    tracks: BTreeMap<(DateTime<Utc>, TrackNum), Track>,
    mode_s: Option<ModeS>,
}

impl TrackCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track: Track) {
        if let Some(begin) = track.begin() {
            if self.mode_s.is_none() {
                self.mode_s = track.mode_s();
            }
            self.tracks.insert((begin, track.track_number), track);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn mode_s(&self) -> Option<ModeS> {
        self.mode_s
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn get(&self, track_number: TrackNum) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|((_, tn), _)| *tn == track_number)
            .map(|(_, t)| t)
    }
}

/// A match graph entry: which test tracks of a given system type were
/// matched to a reference track, ordered by test-track begin time.
pub type MatchGraph = HashMap<SystemType, HashMap<TrackNum, Vec<TrackNum>>>;

/// One real-world target's reference track plus every test system's tracks
/// matched to it.
#[derive(Debug, Clone)]
pub struct TrackCollectionSet {
    pub mode_s: ModeS,
    pub ref_system_type: SystemType,
    pub ref_collection: TrackCollection,
    pub test_collections: HashMap<SystemType, TrackCollection>,
    pub matches: MatchGraph,
}

impl TrackCollectionSet {
    pub fn new(mode_s: ModeS, ref_system_type: SystemType, ref_collection: TrackCollection) -> Self {
        Self {
            mode_s,
            ref_system_type,
            ref_collection,
            test_collections: HashMap::new(),
            matches: HashMap::new(),
        }
    }

    pub fn record_match(&mut self, test_system: SystemType, ref_track: TrackNum, test_track: TrackNum) {
        let entry = self.matches.entry(test_system).or_default().entry(ref_track).or_default();
        if !entry.contains(&test_track) {
            entry.push(test_track);
        }
    }

    pub fn matched_test_tracks(&self, test_system: SystemType, ref_track: TrackNum) -> Vec<&Track> {
        let Some(collection) = self.test_collections.get(&test_system) else {
            return Vec::new();
        };
        let Some(numbers) = self.matches.get(&test_system).and_then(|m| m.get(&ref_track)) else {
            return Vec::new();
        };
        numbers.iter().filter_map(|n| collection.get(*n)).collect()
    }

    pub fn is_valid(&self) -> bool {
        !self.ref_collection.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataSourceId;
    use chrono::TimeZone;

    fn ts(sec: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + sec, 0).unwrap()
    }

    fn report_at(sec: i64, x: f64, track_number: TrackNum, system: SystemType) -> TargetReport {
        TargetReport::new(
            system,
            DataSourceId::new(0, 7),
            ts(sec),
            track_number,
            Enu::new(x, 0.0, None),
            true,
        )
    }

    #[test]
    fn split_track_by_area_covers_all_reports() {
        let mut track = Track::new(SystemType::Adsb, 101);
        for (sec, area) in [(0, Area::RUNWAY), (1, Area::RUNWAY), (2, Area::TAXIWAY)] {
            let mut r = report_at(sec, sec as f64 * 50.0, 101, SystemType::Adsb);
            r.narea = NamedArea::new(area, "x");
            track.insert(r);
        }
        let subtracks = split_track_by_area(&track, TrackSplitMode::SplitByArea);
        let total: usize = subtracks.iter().map(|t| t.len()).sum();
        assert_eq!(total, track.len());
        for sub in &subtracks {
            assert_eq!(sub.nareas().len(), 1);
        }
        assert_eq!(subtracks.len(), 2);
    }

    #[test]
    fn resample_on_existing_timestamps_is_identity() {
        let mut track = Track::new(SystemType::Adsb, 101);
        for sec in 0..5 {
            track.insert(report_at(sec, sec as f64 * 10.0, 101, SystemType::Adsb));
        }
        let resampled = resample(&track, &track.timestamps());
        assert_eq!(resampled.len(), track.len());
        for (a, b) in resampled.reports().zip(track.reports()) {
            assert_eq!(a.position.x, b.position.x);
        }
    }

    #[test]
    fn resample_interpolates_between_brackets() {
        let mut track = Track::new(SystemType::Adsb, 101);
        track.insert(report_at(0, 0.0, 101, SystemType::Adsb));
        track.insert(report_at(10, 100.0, 101, SystemType::Adsb));
        let resampled = resample(&track, &[ts(5)]);
        let sample = resampled.at(ts(5)).unwrap();
        assert!((sample.position.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn intersect_restricts_to_intersector_span() {
        let mut a = Track::new(SystemType::Adsb, 101);
        for sec in 0..10 {
            a.insert(report_at(sec, sec as f64, 101, SystemType::Adsb));
        }
        let mut b = Track::new(SystemType::Smr, 301);
        for sec in 3..6 {
            b.insert(report_at(sec, sec as f64, 301, SystemType::Smr));
        }
        let restricted = intersect(&a, &b).unwrap();
        assert_eq!(restricted.len(), 3);
    }

    #[test]
    fn match_graph_round_trip() {
        let mut ref_col = TrackCollection::new();
        let mut ref_track = Track::new(SystemType::Adsb, 101);
        ref_track.insert(report_at(0, 0.0, 101, SystemType::Adsb));
        ref_col.insert(ref_track);

        let mut set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
        let mut test_col = TrackCollection::new();
        let mut test_track = Track::new(SystemType::Smr, 301);
        test_track.insert(report_at(0, 0.0, 301, SystemType::Smr));
        test_col.insert(test_track);
        set.test_collections.insert(SystemType::Smr, test_col);
        set.record_match(SystemType::Smr, 101, 301);

        let matched = set.matched_test_tracks(SystemType::Smr, 101);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].track_number, 301);
    }
}
