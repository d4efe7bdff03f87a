//! Stage E — Track Associator: build per-real-world-target
//! TrackCollectionSets matching reference tracks (ADS-B/DGPS) to test
//! tracks (SMR/MLAT).

use std::collections::HashMap;

use astmops_core::track::{have_time_intersection, intersect, resample, Track, TrackCollection, TrackCollectionSet};
use astmops_core::types::{ModeS, SystemType};

/// Maximum accepted per-sample Euclidean distance (meters) for a "good"
/// spatio-temporal match.
const DMAX: f64 = 30.0;
/// Minimum fraction of good samples required to accept a spatio-temporal
/// match.
const SCORE_THRESHOLD: f64 = 0.70;

fn euclidean_distance(a: &Track, b: &Track) -> Vec<f64> {
    a.reports()
        .filter_map(|ra| b.at(ra.timestamp).map(|rb| astmops_core::geo::euclidean_distance_2d(ra.position, rb.position)))
        .collect()
}

fn calculate_score(distances: &[f64]) -> f64 {
    if distances.is_empty() {
        return 0.0;
    }
    let n_ok = distances.iter().filter(|d| **d <= DMAX).count();
    n_ok as f64 / distances.len() as f64
}

fn preferred_reference_collection(
    collections: &HashMap<SystemType, TrackCollection>,
    mode_s: ModeS,
) -> Option<(SystemType, TrackCollection)> {
    for system in [SystemType::Dgps, SystemType::Adsb] {
        let Some(source) = collections.get(&system) else {
            continue;
        };
        let mut collection = TrackCollection::new();
        for track in source.tracks() {
            if track.mode_s() == Some(mode_s) {
                collection.insert(track.clone());
            }
        }
        if !collection.is_empty() {
            return Some((system, collection));
        }
    }
    None
}

fn reference_addresses(collections: &HashMap<SystemType, TrackCollection>) -> Vec<ModeS> {
    let mut addresses = Vec::new();
    for system in [SystemType::Adsb, SystemType::Dgps] {
        if let Some(collection) = collections.get(&system) {
            for track in collection.tracks() {
                if let Some(addr) = track.mode_s() {
                    if !addresses.contains(&addr) {
                        addresses.push(addr);
                    }
                }
            }
        }
    }
    addresses
}

/// Build all TrackCollectionSets from the per-system-type tracks produced by
/// stage D.
pub fn associate(collections: &HashMap<SystemType, TrackCollection>) -> HashMap<ModeS, TrackCollectionSet> {
    let mut sets = HashMap::new();

    for mode_s in reference_addresses(collections) {
        let Some((ref_system, ref_collection)) = preferred_reference_collection(collections, mode_s) else {
            continue;
        };
        let mut set = TrackCollectionSet::new(mode_s, ref_system, ref_collection);

        let ref_tracks: Vec<Track> = set.ref_collection.tracks().cloned().collect();
        for ref_track in &ref_tracks {
            if let Some(mlat) = collections.get(&SystemType::Mlat) {
                for t_tst in mlat.tracks() {
                    if t_tst.mode_s() == Some(mode_s) && have_time_intersection(ref_track, t_tst) {
                        record_match_deferred(&mut set, SystemType::Mlat, ref_track, t_tst);
                    } else if t_tst.mode_s().is_none() && have_time_intersection(ref_track, t_tst) {
                        try_spatiotemporal_match(&mut set, SystemType::Mlat, ref_track, t_tst);
                    }
                }
            }
            if let Some(smr) = collections.get(&SystemType::Smr) {
                for t_tst in smr.tracks() {
                    if have_time_intersection(ref_track, t_tst) {
                        try_spatiotemporal_match(&mut set, SystemType::Smr, ref_track, t_tst);
                    }
                }
            }
        }

        if set.is_valid() {
            sets.insert(mode_s, set);
        }
    }

    sets
}

fn record_match_deferred(set: &mut TrackCollectionSet, system: SystemType, ref_track: &Track, t_tst: &Track) {
    set.test_collections.entry(system).or_default().insert(t_tst.clone());
    set.record_match(system, ref_track.track_number, t_tst.track_number);
}

fn try_spatiotemporal_match(set: &mut TrackCollectionSet, system: SystemType, ref_track: &Track, t_tst: &Track) {
    let Some(ref_slice) = intersect(ref_track, t_tst) else {
        return;
    };
    let resampled_ref = resample(&ref_slice, &t_tst.timestamps());
    let distances = euclidean_distance(&resampled_ref, t_tst);
    if calculate_score(&distances) >= SCORE_THRESHOLD {
        record_match_deferred(set, system, ref_track, t_tst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astmops_core::geo::Enu;
    use astmops_core::target_report::TargetReport;
    use astmops_core::types::DataSourceId;
    use chrono::{TimeZone, Utc};

    fn ts(sec: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + sec, 0).unwrap()
    }

    fn report(system: SystemType, track_number: u16, sec: i64, x: f64, mode_s: Option<u32>) -> TargetReport {
        let mut r = TargetReport::new(
            system,
            DataSourceId::new(0, 7),
            ts(sec),
            track_number,
            Enu::new(x, 0.0, None),
            true,
        );
        r.mode_s = mode_s;
        r
    }

    #[test]
    fn mlat_with_mode_s_matches_by_address_and_time() {
        let mut ref_col = TrackCollection::new();
        let mut ref_track = Track::new(SystemType::Adsb, 101);
        for sec in 0..5 {
            ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64, Some(1)));
        }
        ref_col.insert(ref_track);

        let mut mlat_col = TrackCollection::new();
        let mut mlat_track = Track::new(SystemType::Mlat, 201);
        for sec in 1..4 {
            mlat_track.insert(report(SystemType::Mlat, 201, sec, 999.0, Some(1)));
        }
        mlat_col.insert(mlat_track);

        let mut collections = HashMap::new();
        collections.insert(SystemType::Adsb, ref_col);
        collections.insert(SystemType::Mlat, mlat_col);

        let sets = associate(&collections);
        let set = sets.get(&1).unwrap();
        let matched = set.matched_test_tracks(SystemType::Mlat, 101);
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn smr_matches_by_spatiotemporal_score() {
        let mut ref_col = TrackCollection::new();
        let mut ref_track = Track::new(SystemType::Adsb, 101);
        for sec in 0..5 {
            ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64, Some(2)));
        }
        ref_col.insert(ref_track);

        let mut smr_col = TrackCollection::new();
        let mut smr_track = Track::new(SystemType::Smr, 301);
        for sec in 0..5 {
            smr_track.insert(report(SystemType::Smr, 301, sec, sec as f64 + 1.0, None));
        }
        smr_col.insert(smr_track);

        let mut collections = HashMap::new();
        collections.insert(SystemType::Adsb, ref_col);
        collections.insert(SystemType::Smr, smr_col);

        let sets = associate(&collections);
        let set = sets.get(&2).unwrap();
        assert_eq!(set.matched_test_tracks(SystemType::Smr, 101).len(), 1);
    }

    #[test]
    fn unrelated_smr_track_is_not_matched() {
        let mut ref_col = TrackCollection::new();
        let mut ref_track = Track::new(SystemType::Adsb, 101);
        for sec in 0..5 {
            ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64, Some(3)));
        }
        ref_col.insert(ref_track);

        let mut smr_col = TrackCollection::new();
        let mut smr_track = Track::new(SystemType::Smr, 301);
        for sec in 0..5 {
            smr_track.insert(report(SystemType::Smr, 301, sec, sec as f64 + 500.0, None));
        }
        smr_col.insert(smr_track);

        let mut collections = HashMap::new();
        collections.insert(SystemType::Adsb, ref_col);
        collections.insert(SystemType::Smr, smr_col);

        let sets = associate(&collections);
        let set = sets.get(&3).unwrap();
        assert!(set.matched_test_tracks(SystemType::Smr, 101).is_empty());
    }
}
