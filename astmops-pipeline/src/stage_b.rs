//! Stage B — Target-Report Extractor: filter classified records and project
//! them into geometry-bearing Target Reports in local ENU meters.

use std::collections::HashSet;

use astmops_core::area::NamedArea;
use astmops_core::geo::{geo_to_local_enu, Enu, GeoPos};
use astmops_core::target_report::TargetReport;
use astmops_core::types::{MessageType, ModeS, SystemType};

use crate::stage_a::ClassifiedRecord;

const FT_TO_M: f64 = 0.3048;

/// Target classes kept from each reference/test source (TOT for Mlat, ECAT
/// for Adsb): aircraft and helicopter/rotorcraft only.
const MLAT_KEPT_TOT: [u32; 2] = [1, 3];
const ADSB_KEPT_ECAT: [u32; 6] = [1, 2, 3, 4, 5, 10];

pub struct TargetReportExtractor<'a> {
    excluded_addresses: &'a HashSet<ModeS>,
    aerodrome_origin: GeoPos,
}

impl<'a> TargetReportExtractor<'a> {
    pub fn new(excluded_addresses: &'a HashSet<ModeS>, aerodrome_origin: GeoPos) -> Self {
        Self {
            excluded_addresses,
            aerodrome_origin,
        }
    }

    fn is_excluded(&self, mode_s: Option<ModeS>) -> bool {
        mode_s.map(|a| self.excluded_addresses.contains(&a)).unwrap_or(false)
    }

    fn cat10_position(&self, classified: &ClassifiedRecord) -> Option<Enu> {
        let x = classified.record.get("I042", "X")?.as_f64()?;
        let y = classified.record.get("I042", "Y")?.as_f64()?;
        Some(Enu::new(x, y, None))
    }

    fn cat21_position(&self, classified: &ClassifiedRecord) -> Option<Enu> {
        let rec = &classified.record;
        let (lat, lon) = if let Some(item) = rec.item("I131") {
            (item.get("Lat")?.as_f64()?, item.get("Lon")?.as_f64()?)
        } else {
            let item = rec.item("I130")?;
            (item.get("Lat")?.as_f64()?, item.get("Lon")?.as_f64()?)
        };
        let alt_m = rec
            .get("I091", "MHeight")
            .and_then(|e| e.as_f64())
            .or_else(|| rec.get("I145", "FL").and_then(|e| e.as_f64()).map(|fl| fl * 100.0 * FT_TO_M));
        let geo = GeoPos::new(lat, lon, alt_m.unwrap_or(0.0));
        let mut enu = geo_to_local_enu(geo, self.aerodrome_origin);
        if alt_m.is_none() {
            enu.z = None;
        }
        Some(enu)
    }

    /// Extract one Target Report from a classified record, or `None` if it
    /// should be filtered out or is missing required fields.
    pub fn extract(&self, classified: &ClassifiedRecord) -> Option<TargetReport> {
        if classified.record_type.message != MessageType::TargetReport {
            return None;
        }
        let system = classified.record_type.system;
        let rec = &classified.record;

        let (mode_s, on_ground, position, track_number) = match system {
            SystemType::Smr => {
                let position = self.cat10_position(classified)?;
                let track_number = rec.get("I161", "TrkNb")?.as_u32()? as u16;
                (None, true, position, track_number)
            }
            SystemType::Mlat => {
                let mode_s = rec.get("I220", "TAddr").and_then(|e| e.as_hex_u32());
                if self.is_excluded(mode_s) {
                    return None;
                }
                let tot = rec.get("I020", "TOT").and_then(|e| e.as_u32());
                if !tot.map(|t| MLAT_KEPT_TOT.contains(&t)).unwrap_or(false) {
                    return None;
                }
                let position = self.cat10_position(classified)?;
                let track_number = rec.get("I161", "TrkNb")?.as_u32()? as u16;
                let on_ground = rec.get("I020", "GBS").and_then(|e| e.as_bool_bit()).unwrap_or(true);
                (mode_s, on_ground, position, track_number)
            }
            SystemType::Adsb => {
                let mode_s = rec.get("I080", "TAddr").and_then(|e| e.as_hex_u32());
                if self.is_excluded(mode_s) {
                    return None;
                }
                let ecat = rec.get("I020", "ECAT").and_then(|e| e.as_u32());
                if !ecat.map(|e| ADSB_KEPT_ECAT.contains(&e)).unwrap_or(false) {
                    return None;
                }
                let position = self.cat21_position(classified)?;
                let track_number = rec.get("I161", "TrackN")?.as_u32()? as u16;
                let on_ground = rec.get("I040", "GBS").and_then(|e| e.as_bool_bit()).unwrap_or(false);
                (mode_s, on_ground, position, track_number)
            }
            _ => return None,
        };

        let mut report = TargetReport::new(
            system,
            classified.data_source,
            classified.timestamp,
            track_number,
            position,
            on_ground,
        );
        report.mode_s = mode_s;
        report.mode_3a = rec
            .get("I060", "Mode3A")
            .or_else(|| rec.get("I070", "Mode3A"))
            .and_then(|e| e.as_octal_u16());
        report.ident = rec.get("I245", "Ident").map(|e| e.as_str().to_string());
        report.narea = NamedArea::none();
        if system == SystemType::Adsb {
            report.version = rec.get("I210", "VER").and_then(|e| e.as_u32()).map(|v| v as u8);
            report.pic = rec.get("I090", "PIC").and_then(|e| e.as_u32()).map(|v| v as u8);
        }
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage_a::ClassifiedRecord;
    use asterix_record::{DataItem, Record};
    use astmops_core::types::{DataSourceId, MessageType, RecordType};
    use chrono::Utc;

    fn classified_smr(x: f64, y: f64) -> ClassifiedRecord {
        let mut i042 = DataItem::new();
        i042.insert("X", x.to_string()).insert("Y", y.to_string());
        let mut i161 = DataItem::new();
        i161.insert("TrkNb", "301");
        let record = Record::new(10).with_item("I042", i042).with_item("I161", i161);

        ClassifiedRecord {
            record,
            record_type: RecordType::new(SystemType::Smr, MessageType::TargetReport),
            data_source: DataSourceId::new(0, 7),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn smr_report_is_always_on_ground() {
        let excluded = HashSet::new();
        let extractor = TargetReportExtractor::new(&excluded, GeoPos::new(0.0, 0.0, 0.0));
        let report = extractor.extract(&classified_smr(10.0, 20.0)).unwrap();
        assert!(report.on_ground);
        assert_eq!(report.position, Enu::new(10.0, 20.0, None));
    }

    #[test]
    fn excluded_mlat_address_is_dropped() {
        let mut i220 = DataItem::new();
        i220.insert("TAddr", "ABCDEF");
        let mut i020 = DataItem::new();
        i020.insert("TOT", "1");
        let mut i042 = DataItem::new();
        i042.insert("X", "1.0").insert("Y", "2.0");
        let mut i161 = DataItem::new();
        i161.insert("TrkNb", "201");
        let record = Record::new(10)
            .with_item("I220", i220)
            .with_item("I020", i020)
            .with_item("I042", i042)
            .with_item("I161", i161);
        let classified = ClassifiedRecord {
            record,
            record_type: RecordType::new(SystemType::Mlat, MessageType::TargetReport),
            data_source: DataSourceId::new(0, 107),
            timestamp: Utc::now(),
        };

        let mut excluded = HashSet::new();
        excluded.insert(0xABCDEF);
        let extractor = TargetReportExtractor::new(&excluded, GeoPos::new(0.0, 0.0, 0.0));
        assert!(extractor.extract(&classified).is_none());
    }
}
