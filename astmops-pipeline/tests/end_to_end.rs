//! End-to-end reproductions of the six concrete surveillance-performance
//! scenarios: a straight SMR runway transit (matched and unmatched), an
//! MLAT straight transit, and ident agreement/disagreement on MLAT.
//! Each scenario builds the minimal Track/Config fixtures directly (the
//! area each report falls in is given, the way it would already be tagged
//! by stage C) and asserts the exact resulting counters.

use std::collections::HashMap;

use astmops_core::area::{Area, NamedArea};
use astmops_core::config::{Config, ProcessingMode};
use astmops_core::geo::Enu;
use astmops_core::target_report::TargetReport;
use astmops_core::track::{Track, TrackCollection, TrackCollectionSet};
use astmops_core::types::{DataSourceId, SystemType};
use astmops_pipeline::stage_f;
use chrono::{NaiveDate, TimeZone, Utc};

fn config() -> Config {
    Config::new(NaiveDate::from_ymd_opt(2020, 5, 5).unwrap(), ProcessingMode::TestOfOpportunity)
}

fn ts(sec: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 5, 5, 10, 0, 0).unwrap() + chrono::Duration::seconds(sec)
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

fn straight_transit_area(sec: i64) -> Area {
    if sec < 7 {
        Area::RUNWAY
    } else {
        Area::TAXIWAY
    }
}

#[test]
fn scenario_1_ur_100_percent_smr_straight_transit() {
    let mut ref_track = Track::new(SystemType::Adsb, 101);
    for sec in 0..=8 {
        ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64 * 50.0, straight_transit_area(sec)));
    }
    let mut ref_col = TrackCollection::new();
    ref_col.insert(ref_track);

    let mut smr_track = Track::new(SystemType::Smr, 301);
    for sec in 0..=8 {
        smr_track.insert(report(SystemType::Smr, 301, sec, sec as f64 * 50.0, straight_transit_area(sec)));
    }
    let mut smr_col = TrackCollection::new();
    smr_col.insert(smr_track);

    let mut set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
    set.test_collections.insert(SystemType::Smr, smr_col);
    set.record_match(SystemType::Smr, 101, 301);
    let mut sets = HashMap::new();
    sets.insert(1, set);

    let result = stage_f::evaluate(&sets, &config());
    let runway = NamedArea::new(Area::RUNWAY, "A");
    let taxiway = NamedArea::new(Area::TAXIWAY, "A");

    assert_eq!(result.smr_ur[&runway].n_tr, 5);
    assert_eq!(result.smr_ur[&runway].n_etr, 5);
    assert_eq!(result.smr_ur[&runway].percentage(), 1.0);
    assert_eq!(result.smr_ur[&taxiway].n_tr, 2);
    assert_eq!(result.smr_ur[&taxiway].n_etr, 2);
    assert_eq!(result.smr_ur[&taxiway].percentage(), 1.0);
}

#[test]
fn scenario_2_ur_0_percent_smr_missing_test_track() {
    let mut ref_track = Track::new(SystemType::Adsb, 101);
    for sec in 0..=8 {
        ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64 * 50.0, straight_transit_area(sec)));
    }
    let mut ref_col = TrackCollection::new();
    ref_col.insert(ref_track);

    let set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
    let mut sets = HashMap::new();
    sets.insert(1, set);

    let result = stage_f::evaluate(&sets, &config());
    let runway = NamedArea::new(Area::RUNWAY, "A");
    let taxiway = NamedArea::new(Area::TAXIWAY, "A");

    assert_eq!(result.smr_ur[&runway].n_etr, 5);
    assert_eq!(result.smr_ur[&runway].n_tr, 0);
    assert_eq!(result.smr_ur[&runway].percentage(), 0.0);
    assert_eq!(result.smr_ur[&taxiway].n_etr, 2);
    assert_eq!(result.smr_ur[&taxiway].n_tr, 0);
    assert_eq!(result.smr_ur[&taxiway].percentage(), 0.0);
}

#[test]
fn scenario_3_pd_100_percent_mlat_straight_transit() {
    let mut ref_track = Track::new(SystemType::Adsb, 101);
    for sec in 0..=8 {
        ref_track.insert(report(SystemType::Adsb, 101, sec, sec as f64 * 50.0, straight_transit_area(sec)));
    }
    let mut ref_col = TrackCollection::new();
    ref_col.insert(ref_track);

    let mut mlat_track = Track::new(SystemType::Mlat, 201);
    for sec in 0..=8 {
        mlat_track.insert(report(SystemType::Mlat, 201, sec, sec as f64 * 50.0, straight_transit_area(sec)));
    }
    let mut mlat_col = TrackCollection::new();
    mlat_col.insert(mlat_track);

    let mut set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
    set.test_collections.insert(SystemType::Mlat, mlat_col);
    set.record_match(SystemType::Mlat, 101, 201);
    let mut sets = HashMap::new();
    sets.insert(1, set);

    let result = stage_f::evaluate(&sets, &config());
    let runway = NamedArea::new(Area::RUNWAY, "A");
    let taxiway = NamedArea::new(Area::TAXIWAY, "A");

    assert_eq!(result.mlat_pd[&runway].percentage(), 1.0);
    assert_eq!(result.mlat_pd[&taxiway].percentage(), 1.0);
}

fn ident_scenario(test_ident: &str) -> stage_f::EvaluationResult {
    let mut ref_track = Track::new(SystemType::Adsb, 101);
    for sec in 0..=4 {
        ref_track.insert(report_with_ident(SystemType::Adsb, 101, sec, sec as f64 * 50.0, Area::RUNWAY, "FOO1234 "));
    }
    let mut ref_col = TrackCollection::new();
    ref_col.insert(ref_track);

    let mut mlat_track = Track::new(SystemType::Mlat, 201);
    for sec in 0..=4 {
        mlat_track.insert(report_with_ident(SystemType::Mlat, 201, sec, sec as f64 * 50.0, Area::RUNWAY, test_ident));
    }
    let mut mlat_col = TrackCollection::new();
    mlat_col.insert(mlat_track);

    let mut set = TrackCollectionSet::new(1, SystemType::Adsb, ref_col);
    set.test_collections.insert(SystemType::Mlat, mlat_col);
    set.record_match(SystemType::Mlat, 101, 201);
    let mut sets = HashMap::new();
    sets.insert(1, set);

    stage_f::evaluate(&sets, &config())
}

#[test]
fn scenario_4_pid_mismatch_detection() {
    let result = ident_scenario("FOO5678 ");
    let runway = NamedArea::new(Area::RUNWAY, "A");
    assert_eq!(result.mlat_pid_ident[&runway].n_itr, 5);
    assert_eq!(result.mlat_pid_ident[&runway].n_citr, 0);
}

#[test]
fn scenario_4_pid_agreement() {
    let result = ident_scenario("FOO1234 ");
    let runway = NamedArea::new(Area::RUNWAY, "A");
    assert_eq!(result.mlat_pid_ident[&runway].n_citr, result.mlat_pid_ident[&runway].n_itr);
    assert_eq!(result.mlat_pid_ident[&runway].percentage(), 1.0);
}

#[test]
fn scenario_5_pfid_detects_disagreement() {
    let result = ident_scenario("FOO5678 ");
    let runway = NamedArea::new(Area::RUNWAY, "A");
    assert_eq!(result.mlat_pfid_ident[&runway].n_eitr, result.mlat_pfid_ident[&runway].n_itr);
    assert_eq!(result.mlat_pfid_ident[&runway].percentage(), 1.0);
}

#[test]
fn scenario_5_pfid_accepts_agreement() {
    let result = ident_scenario("FOO1234 ");
    let runway = NamedArea::new(Area::RUNWAY, "A");
    assert_eq!(result.mlat_pfid_ident[&runway].n_eitr, 0);
    assert_eq!(result.mlat_pfid_ident[&runway].percentage(), 0.0);
}
