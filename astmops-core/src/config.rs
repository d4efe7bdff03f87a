//! Process-wide, read-only evaluation configuration.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::area::Area;
use crate::error::{CoreError, CoreErrorKind, Result};
use crate::types::ModeS;

/// Which reference is evaluated against the test sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Test of opportunity: ADS-B traffic already on the aerodrome.
    TestOfOpportunity,
    /// A single DGPS-equipped vehicle driven around the surface.
    Dgps,
}

/// Per-area SMR/MLAT update-period (§4.F PD) named options: how often a
/// test system is expected to refresh a track while in each surface area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MlatPdPeriods {
    pub stand: f64,
    pub apron_lane: f64,
    pub taxiway: f64,
    pub runway: f64,
    pub airborne1: f64,
    pub airborne2: f64,
}

impl Default for MlatPdPeriods {
    fn default() -> Self {
        Self {
            stand: 5.0,
            apron_lane: 2.0,
            taxiway: 2.0,
            runway: 1.0,
            airborne1: 1.0,
            airborne2: 1.0,
        }
    }
}

impl MlatPdPeriods {
    /// The configured MLAT PD period for the leaf area a report falls
    /// within; ground areas other than stand/apron lane/taxiway default
    /// to the runway period.
    pub fn period_for(&self, area: Area) -> f64 {
        match area {
            Area::STAND => self.stand,
            Area::APRON_LANE => self.apron_lane,
            Area::TAXIWAY => self.taxiway,
            Area::AIRBORNE1 => self.airborne1,
            Area::AIRBORNE2 => self.airborne2,
            _ => self.runway,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub date: NaiveDate,
    pub processing_mode: ProcessingMode,
    pub smr_sics: HashSet<u8>,
    pub mlat_sics: HashSet<u8>,
    pub adsb_sics: HashSet<u8>,
    pub dgps_target_address: Option<ModeS>,
    pub rpa_pic_percentile: f64,
    pub silence_period_seconds: f64,
    /// Update-rate target (1 Hz default) used by the UR `n_etr` formula.
    pub update_rate_hz: f64,
    /// SMR PD sampling period, constant across areas (§4.F PD).
    pub smr_pd_period_secs: f64,
    /// Per-area MLAT PD sampling periods (§4.F PD).
    pub mlat_pd_periods: MlatPdPeriods,
}

impl Config {
    pub fn new(date: NaiveDate, processing_mode: ProcessingMode) -> Self {
        Self {
            date,
            processing_mode,
            smr_sics: HashSet::new(),
            mlat_sics: HashSet::new(),
            adsb_sics: HashSet::new(),
            dgps_target_address: None,
            rpa_pic_percentile: 95.0,
            silence_period_seconds: 60.0,
            update_rate_hz: 1.0,
            smr_pd_period_secs: 1.0,
            mlat_pd_periods: MlatPdPeriods::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.rpa_pic_percentile) {
            return Err(CoreError(CoreErrorKind::InvalidPercentile(
                self.rpa_pic_percentile,
            )));
        }
        for sic in self.smr_sics.intersection(&self.mlat_sics) {
            return Err(CoreError(CoreErrorKind::OverlappingSicSets { sic: *sic }));
        }
        for sic in self.smr_sics.intersection(&self.adsb_sics) {
            return Err(CoreError(CoreErrorKind::OverlappingSicSets { sic: *sic }));
        }
        for sic in self.mlat_sics.intersection(&self.adsb_sics) {
            return Err(CoreError(CoreErrorKind::OverlappingSicSets { sic: *sic }));
        }
        if self.processing_mode == ProcessingMode::Dgps && self.dgps_target_address.is_none() {
            return Err(CoreError(CoreErrorKind::MissingDgpsTargetAddress));
        }
        Ok(())
    }
}
