//! Stage F — Performance Evaluator: compute per-area ED-116/ED-117 counters
//! over matched TrackCollectionSets.

use std::collections::{BTreeSet, HashMap};

use astmops_core::area::{Area, NamedArea};
use astmops_core::config::Config;
use astmops_core::counters::{IntervalCounter, Pd, Pfd, Pfd2, Pfid, Pid, Plg, Rpa, Ur};
use astmops_core::geo::euclidean_distance_2d;
use astmops_core::stats;
use astmops_core::traffic::{TrafficPeriod, TrafficPeriodCollection};
use astmops_core::track::{average, intersect, resample, split_track_by_area, Track, TrackCollectionSet, TrackSplitMode};
use astmops_core::types::{ModeS, SystemType};

const MLAT_PFD_DISTANCE_THRESHOLD_M: f64 = 50.0;
const MIN_SUBTRACK_DURATION_SECS: f64 = 1.0;
const MLAT_STAND_AVERAGING_WINDOW_SECS: i64 = 5;

fn plg_threshold(area: Area) -> f64 {
    if area == Area::STAND {
        15.0
    } else {
        3.0
    }
}

/// All per-area counters produced by one evaluation run.
#[derive(Debug, Default)]
pub struct EvaluationResult {
    pub smr_rpa: HashMap<NamedArea, Rpa>,
    pub smr_ur: HashMap<NamedArea, Ur>,
    pub smr_pd: HashMap<NamedArea, Pd>,
    pub smr_pfd: HashMap<NamedArea, Pfd2>,
    pub mlat_rpa: HashMap<NamedArea, Rpa>,
    pub mlat_ur: HashMap<NamedArea, Ur>,
    pub mlat_pd: HashMap<NamedArea, Pd>,
    pub mlat_pfd: HashMap<NamedArea, Pfd>,
    pub mlat_pid_ident: HashMap<NamedArea, Pid>,
    pub mlat_pid_mode3a: HashMap<NamedArea, Pid>,
    pub mlat_pfid_ident: HashMap<NamedArea, Pfid>,
    pub mlat_pfid_mode3a: HashMap<NamedArea, Pfid>,
    pub mlat_plg: HashMap<NamedArea, Plg>,
}

/// Scan every reference report for a PIC baseline and return the configured
/// percentile of the distribution, or `None` if no reports qualify.
fn compute_pic_threshold(config: &Config, sets: &HashMap<ModeS, TrackCollectionSet>) -> Option<f64> {
    let pics: Vec<f64> = sets
        .values()
        .flat_map(|set| set.ref_collection.tracks())
        .flat_map(|track| track.reports())
        .filter(|r| r.version == Some(2))
        .filter_map(|r| r.pic)
        .map(|p| p as f64)
        .collect();
    (!pics.is_empty()).then(|| stats::percentile(&pics, config.rpa_pic_percentile))
}

/// Restrict `track` to reports meeting the RPA quality baseline (ADS-B
/// version 2 with PIC at or above the configured percentile threshold).
fn filter_track_by_quality(track: &Track, pic_p95: Option<f64>) -> Option<Track> {
    let threshold = pic_p95?;
    let mut out = Track::new(track.system_type, track.track_number);
    for report in track.reports() {
        if report.version == Some(2) && report.pic.map(|p| p as f64 >= threshold).unwrap_or(false) {
            out.insert(report.clone());
        }
    }
    (!out.is_empty()).then_some(out)
}

pub fn evaluate(sets: &HashMap<ModeS, TrackCollectionSet>, config: &Config) -> EvaluationResult {
    let pic_p95 = compute_pic_threshold(config, sets);
    let mut result = EvaluationResult::default();

    let mut smr_traffic: HashMap<NamedArea, TrafficPeriodCollection> = HashMap::new();
    let mut smr_pfd_tr: HashMap<NamedArea, u64> = HashMap::new();

    for set in sets.values() {
        for ref_track in set.ref_collection.tracks() {
            let subtracks = split_track_by_area(ref_track, TrackSplitMode::SplitByNamedArea);
            for sub_r in &subtracks {
                let Some(area_key) = sub_r.nareas().first().cloned() else {
                    continue;
                };
                if area_key.area == Area::NONE {
                    continue;
                }
                if sub_r.duration_secs() < MIN_SUBTRACK_DURATION_SECS {
                    continue;
                }
                let (Some(begin), Some(end)) = (sub_r.begin(), sub_r.end()) else {
                    continue;
                };

                let mut addresses = BTreeSet::new();
                addresses.insert(set.mode_s);
                smr_traffic
                    .entry(area_key.clone())
                    .or_default()
                    .insert(TrafficPeriod::new(begin, end, addresses));

                result.smr_ur.entry(area_key.clone()).or_default().n_etr +=
                    (sub_r.duration_secs() * config.update_rate_hz).floor() as u64;
                result.mlat_ur.entry(area_key.clone()).or_default().n_etr +=
                    (sub_r.duration_secs() * config.update_rate_hz).floor() as u64;

                let quality_sub_r = filter_track_by_quality(sub_r, pic_p95);

                evaluate_smr(&mut result, config, set, ref_track, sub_r, &area_key, &quality_sub_r, &mut smr_pfd_tr);
                evaluate_mlat(&mut result, config, set, ref_track, sub_r, &area_key, &quality_sub_r);
            }
        }
    }

    for (area, collection) in smr_traffic {
        let n_u = collection.total_duration_secs().floor() as u64;
        let n_etr = collection.traffic_weighted_duration_secs().floor() as u64;
        let n_tr = *smr_pfd_tr.get(&area).unwrap_or(&0);
        result.smr_pfd.entry(area).or_default().add(Pfd2 { n_tr, n_etr, n_u });
    }

    result
}

fn evaluate_smr(
    result: &mut EvaluationResult,
    config: &Config,
    set: &TrackCollectionSet,
    ref_track: &Track,
    sub_r: &Track,
    area_key: &NamedArea,
    quality_sub_r: &Option<Track>,
    smr_pfd_tr: &mut HashMap<NamedArea, u64>,
) {
    let mut pd_counter = IntervalCounter::new(config.smr_pd_period_secs, sub_r.begin().unwrap());

    for t_tst in set.matched_test_tracks(SystemType::Smr, ref_track.track_number) {
        if let Some(in_window) = intersect(t_tst, sub_r) {
            result.smr_ur.entry(area_key.clone()).or_default().n_tr += in_window.len() as u64;
            *smr_pfd_tr.entry(area_key.clone()).or_default() += in_window.len() as u64;
            for report in in_window.reports() {
                pd_counter.update(report.timestamp);
            }
        }

        if let Some(quality) = quality_sub_r {
            let resampled = resample(quality, &t_tst.timestamps());
            for ref_sample in resampled.reports() {
                if let Some(test_sample) = t_tst.at(ref_sample.timestamp) {
                    let d = euclidean_distance_2d(ref_sample.position, test_sample.position);
                    result.smr_rpa.entry(area_key.clone()).or_default().distances.push(d);
                }
            }
        }
    }

    let (valid, total) = pd_counter.finish(sub_r.end().unwrap());
    result.smr_pd.entry(area_key.clone()).or_default().add(Pd { n_tr: valid, n_up: total });
}

fn evaluate_mlat(
    result: &mut EvaluationResult,
    config: &Config,
    set: &TrackCollectionSet,
    ref_track: &Track,
    sub_r: &Track,
    area_key: &NamedArea,
    quality_sub_r: &Option<Track>,
) {
    let mut pd_counter = IntervalCounter::new(
        config.mlat_pd_periods.period_for(area_key.area),
        sub_r.begin().unwrap(),
    );
    let threshold = plg_threshold(area_key.area);

    for t_tst in set.matched_test_tracks(SystemType::Mlat, ref_track.track_number) {
        let smoothed;
        let t_tst_eff: &Track = if area_key.area == Area::STAND {
            smoothed = average(t_tst, chrono::Duration::seconds(MLAT_STAND_AVERAGING_WINDOW_SECS));
            &smoothed
        } else {
            t_tst
        };

        if let Some(in_window) = intersect(t_tst_eff, sub_r) {
            result.mlat_ur.entry(area_key.clone()).or_default().n_tr += in_window.len() as u64;
            for report in in_window.reports() {
                pd_counter.update(report.timestamp);
            }
        }

        if let Some(quality) = quality_sub_r {
            let resampled = resample(quality, &t_tst_eff.timestamps());
            for ref_sample in resampled.reports() {
                if let Some(test_sample) = t_tst_eff.at(ref_sample.timestamp) {
                    let d = euclidean_distance_2d(ref_sample.position, test_sample.position);
                    result.mlat_rpa.entry(area_key.clone()).or_default().distances.push(d);
                }
            }
        }

        let resampled_full = resample(sub_r, &t_tst_eff.timestamps());
        let pfd = result.mlat_pfd.entry(area_key.clone()).or_default();
        for ref_sample in resampled_full.reports() {
            if let Some(test_sample) = t_tst_eff.at(ref_sample.timestamp) {
                let d = euclidean_distance_2d(ref_sample.position, test_sample.position);
                pfd.n_tr += 1;
                if d > MLAT_PFD_DISTANCE_THRESHOLD_M {
                    pfd.n_ftr += 1;
                }
            }
        }

        for test_sample in t_tst_eff.reports() {
            let Some(begin) = sub_r.begin() else { continue };
            let Some(end) = sub_r.end() else { continue };
            if test_sample.timestamp < begin || test_sample.timestamp > end {
                continue;
            }
            let (before, after) = sub_r.bracket(test_sample.timestamp);
            let brackets = [before, after];

            if let Some(test_ident) = &test_sample.ident {
                let defined: Vec<&String> = brackets.iter().flatten().filter_map(|r| r.ident.as_ref()).collect();
                if !defined.is_empty() {
                    let pid = result.mlat_pid_ident.entry(area_key.clone()).or_default();
                    pid.n_itr += 1;
                    if defined.iter().any(|d| *d == test_ident) {
                        pid.n_citr += 1;
                    }
                    let pfid = result.mlat_pfid_ident.entry(area_key.clone()).or_default();
                    pfid.n_itr += 1;
                    if defined.iter().all(|d| *d != test_ident) {
                        pfid.n_eitr += 1;
                    }
                }
            }

            if let Some(test_m3a) = test_sample.mode_3a {
                let defined: Vec<u16> = brackets.iter().flatten().filter_map(|r| r.mode_3a).collect();
                if !defined.is_empty() {
                    let pid = result.mlat_pid_mode3a.entry(area_key.clone()).or_default();
                    pid.n_itr += 1;
                    if defined.contains(&test_m3a) {
                        pid.n_citr += 1;
                    }
                    let pfid = result.mlat_pfid_mode3a.entry(area_key.clone()).or_default();
                    pfid.n_itr += 1;
                    if !defined.contains(&test_m3a) {
                        pfid.n_eitr += 1;
                    }
                }
            }
        }

        let samples: Vec<_> = t_tst_eff
            .reports()
            .filter(|r| sub_r.begin().map(|b| r.timestamp >= b).unwrap_or(false) && sub_r.end().map(|e| r.timestamp <= e).unwrap_or(false))
            .collect();
        let plg = result.mlat_plg.entry(area_key.clone()).or_default();
        if !samples.is_empty() {
            plg.n_tr += 1;
        }
        for window in samples.windows(2) {
            plg.n_tr += 1;
            let gap_secs = (window[1].timestamp - window[0].timestamp).num_milliseconds() as f64 / 1000.0;
            if gap_secs >= threshold {
                plg.n_g += 1;
            }
        }
    }

    let (valid, total) = pd_counter.finish(sub_r.end().unwrap());
    result.mlat_pd.entry(area_key.clone()).or_default().add(Pd { n_tr: valid, n_up: total });
}

#[cfg(test)]
mod tests {
    use super::*;
    use astmops_core::config::ProcessingMode;
    use astmops_core::geo::Enu;
    use astmops_core::target_report::TargetReport;
    use astmops_core::track::TrackCollection;
    use astmops_core::types::DataSourceId;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn ts(sec: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + sec, 0).unwrap()
    }

    fn report(system: SystemType, track_number: u16, sec: i64, x: f64, area: Area) -> TargetReport {
        let mut r = TargetReport::new(
            system,
            DataSourceId::new(0, 7),
            ts(sec),
            track_number,
            Enu::new(x, 0.0, None),
            true,
        );
        r.narea = NamedArea::new(area, "A");
        r
    }

    fn report_with_ident(system: SystemType, track_number: u16, sec: i64, x: f64, area: Area, ident: &str) -> TargetReport {
        let mut r = report(system, track_number, sec, x, area);
        r.ident = Some(ident.to_string());
        r
    }

    fn config() -> Config {
        Config::new(NaiveDate::from_ymd_opt(2020, 5, 5).unwrap(), ProcessingMode::TestOfOpportunity)
    }

    #[test]
    fn ur_100_percent_smr_straight_transit() {
        let mut ref_track = Track::new(SystemType::Adsb, 101);
        for sec in 0..=7 {
            let area = if sec < 7 { Area::RUNWAY } else { Area::TAXIWAY };
            ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64 * 50.0, area));
        }
        ref_track.insert(report(SystemType::Adsb, 101, 8, 400.0, Area::TAXIWAY));
        let mut ref_col = TrackCollection::new();
        ref_col.insert(ref_track);

        let mut smr_track = Track::new(SystemType::Smr, 301);
        for sec in 0..=8 {
            let area = if sec < 7 { Area::RUNWAY } else { Area::TAXIWAY };
            smr_track.insert(report(SystemType::Smr, 301, sec, sec as f64 * 50.0, area));
        }
        let mut smr_col = TrackCollection::new();
        smr_col.insert(smr_track);

        let mut set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
        set.test_collections.insert(SystemType::Smr, smr_col);
        set.record_match(SystemType::Smr, 101, 301);

        let mut sets = HashMap::new();
        sets.insert(1, set);

        let result = evaluate(&sets, &config());
        let runway = NamedArea::new(Area::RUNWAY, "A");
        let taxiway = NamedArea::new(Area::TAXIWAY, "A");

        assert_eq!(result.smr_ur[&runway].n_etr, 5);
        assert_eq!(result.smr_ur[&runway].n_tr, 5);
        assert_eq!(result.smr_ur[&taxiway].n_etr, 2);
        assert_eq!(result.smr_ur[&taxiway].n_tr, 2);
    }

    #[test]
    fn ur_0_percent_without_matched_test_track() {
        let mut ref_track = Track::new(SystemType::Adsb, 101);
        for sec in 0..=7 {
            let area = if sec < 7 { Area::RUNWAY } else { Area::TAXIWAY };
            ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64 * 50.0, area));
        }
        let mut ref_col = TrackCollection::new();
        ref_col.insert(ref_track);

        let set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
        let mut sets = HashMap::new();
        sets.insert(1, set);

        let result = evaluate(&sets, &config());
        let runway = NamedArea::new(Area::RUNWAY, "A");
        assert_eq!(result.smr_ur[&runway].n_tr, 0);
        assert!(result.smr_ur[&runway].n_etr > 0);
        assert_eq!(result.smr_ur[&runway].percentage(), 0.0);
    }

    #[test]
    fn pd_100_percent_mlat_straight_transit() {
        let mut ref_track = Track::new(SystemType::Adsb, 101);
        for sec in 0..=8 {
            let area = if sec < 7 { Area::RUNWAY } else { Area::TAXIWAY };
            ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64 * 50.0, area));
        }
        let mut ref_col = TrackCollection::new();
        ref_col.insert(ref_track);

        let mut mlat_track = Track::new(SystemType::Mlat, 201);
        for sec in 0..=8 {
            let area = if sec < 7 { Area::RUNWAY } else { Area::TAXIWAY };
            mlat_track.insert(report(SystemType::Mlat, 201, sec, sec as f64 * 50.0, area));
        }
        let mut mlat_col = TrackCollection::new();
        mlat_col.insert(mlat_track);

        let mut set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
        set.test_collections.insert(SystemType::Mlat, mlat_col);
        set.record_match(SystemType::Mlat, 101, 201);

        let mut sets = HashMap::new();
        sets.insert(1, set);

        let result = evaluate(&sets, &config());
        let runway = NamedArea::new(Area::RUNWAY, "A");
        assert_eq!(result.mlat_pd[&runway].percentage(), 1.0);
    }

    #[test]
    fn pfid_counts_mismatched_ident_as_erroneous() {
        let mut ref_track = Track::new(SystemType::Adsb, 101);
        for sec in 0..=4 {
            ref_track.insert(report_with_ident(SystemType::Adsb, 101, sec, sec as f64 * 50.0, Area::RUNWAY, "AFR001"));
        }
        let mut ref_col = TrackCollection::new();
        ref_col.insert(ref_track);

        let mut mlat_track = Track::new(SystemType::Mlat, 201);
        for sec in 0..=4 {
            mlat_track.insert(report_with_ident(SystemType::Mlat, 201, sec, sec as f64 * 50.0, Area::RUNWAY, "WRONG01"));
        }
        let mut mlat_col = TrackCollection::new();
        mlat_col.insert(mlat_track);

        let mut set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
        set.test_collections.insert(SystemType::Mlat, mlat_col);
        set.record_match(SystemType::Mlat, 101, 201);

        let mut sets = HashMap::new();
        sets.insert(1, set);

        let result = evaluate(&sets, &config());
        let runway = NamedArea::new(Area::RUNWAY, "A");
        assert_eq!(result.mlat_pfid_ident[&runway].percentage(), 1.0);
        assert_eq!(result.mlat_pid_ident[&runway].percentage(), 0.0);
    }
}
