//! The normalized observation every pipeline stage after B operates on.

use chrono::{DateTime, Utc};

use crate::area::NamedArea;
use crate::geo::Enu;
use crate::types::{DataSourceId, Mode3A, ModeS, SystemType, TrackNum};

/// One target observation, projected to local ENU meters and tagged with an
/// absolute UTC timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub system_type: SystemType,
    pub data_source: DataSourceId,
    pub timestamp: DateTime<Utc>,
    pub track_number: TrackNum,
    pub mode_s: Option<ModeS>,
    pub mode_3a: Option<Mode3A>,
    pub ident: Option<String>,
    pub on_ground: bool,
    /// `position.z` is `None` when no altitude source was available
    /// (surface-only reports).
    pub position: Enu,
    pub narea: NamedArea,
    /// ADS-B version number (2 = carries a PIC value).
    pub version: Option<u8>,
    /// Position Integrity Category, present only for version-2 reports.
    pub pic: Option<u8>,
}

impl TargetReport {
    pub fn new(
        system_type: SystemType,
        data_source: DataSourceId,
        timestamp: DateTime<Utc>,
        track_number: TrackNum,
        position: Enu,
        on_ground: bool,
    ) -> Self {
        // Invariant: Smr reports are always on the ground.
        let on_ground = on_ground || system_type == SystemType::Smr;
        Self {
            system_type,
            data_source,
            timestamp,
            track_number,
            mode_s: None,
            mode_3a: None,
            ident: None,
            on_ground,
            position,
            narea: NamedArea::none(),
            version: None,
            pic: None,
        }
    }

    /// True iff this report is eligible as an RPA/accuracy quality baseline:
    /// ADS-B version 2 with a defined PIC.
    pub fn is_quality_baseline(&self) -> bool {
        self.version == Some(2) && self.pic.is_some()
    }
}
