//! File collaborators: decoded-record stream, excluded-address list, and
//! aerodrome geometry, each read from disk into the core's in-memory types.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use asterix_record::{DataItem, Record};
use astmops_core::aerodrome::{Aerodrome, Polygon};
use astmops_core::area::Area;
use astmops_core::geo::{geo_to_local_enu, Enu, GeoPos};
use astmops_core::target_report::TargetReport;
use astmops_core::track::Track;
use astmops_core::types::{DataSourceId, ModeS, SystemType};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{CliError, Result};

/// One line of the decoded-record JSON Lines input: `{category, items}`
/// where `items` is `{item_name: {element_name: value}}`.
#[derive(Debug, Deserialize)]
struct DecodedRecord {
    category: u8,
    #[serde(default)]
    items: HashMap<String, HashMap<String, String>>,
}

/// Read a newline-delimited JSON stream of decoded records.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let decoded: DecodedRecord = serde_json::from_str(line).map_err(|source| CliError::MalformedRecord {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        let mut record = Record::new(decoded.category);
        for (item_name, elements) in decoded.items {
            let mut item = DataItem::new();
            for (element_name, value) in elements {
                item.insert(element_name, value);
            }
            record = record.with_item(item_name, item);
        }
        records.push(record);
    }
    Ok(records)
}

/// Read a line-oriented excluded-addresses file: blank lines and
/// `#`-prefixed comments are ignored, every other line is a hex mode-S
/// address.
pub fn read_excluded_addresses(path: &Path) -> Result<HashSet<ModeS>> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut addresses = HashSet::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value = u32::from_str_radix(line, 16).map_err(|_| CliError::InvalidExcludedAddress {
            path: path.to_path_buf(),
            line: idx + 1,
            value: line.to_string(),
        })?;
        addresses.insert(value);
    }
    Ok(addresses)
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct ReferencePoint {
    lat: f64,
    lon: f64,
    alt: f64,
}

/// A named polygon ring: `{name, ring: [{lat, lon}, ...]}`.
#[derive(Debug, Deserialize)]
struct NamedRing {
    name: String,
    ring: Vec<GeoPoint>,
}

#[derive(Debug, Deserialize)]
struct AerodromeFile {
    reference_point: ReferencePoint,
    #[serde(default)]
    runway: Vec<NamedRing>,
    #[serde(default)]
    taxiway: Vec<NamedRing>,
    #[serde(default)]
    apron_lane: Vec<NamedRing>,
    #[serde(default)]
    stand: Vec<NamedRing>,
    #[serde(default)]
    airborne1: Vec<NamedRing>,
    #[serde(default)]
    airborne2: Vec<NamedRing>,
}

/// Read the aerodrome reference point and per-area-kind named polygon rings
/// (in geographic coordinates), converting every ring to local ENU meters.
pub fn read_aerodrome(path: &Path) -> Result<(Aerodrome, GeoPos)> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: AerodromeFile = serde_json::from_str(&text).map_err(|source| CliError::MalformedAerodromeFile {
        path: path.to_path_buf(),
        source,
    })?;

    let origin = GeoPos::new(file.reference_point.lat, file.reference_point.lon, file.reference_point.alt);
    let mut aerodrome = Aerodrome::new();
    for (area, rings) in [
        (Area::RUNWAY, &file.runway),
        (Area::TAXIWAY, &file.taxiway),
        (Area::APRON_LANE, &file.apron_lane),
        (Area::STAND, &file.stand),
        (Area::AIRBORNE1, &file.airborne1),
        (Area::AIRBORNE2, &file.airborne2),
    ] {
        for ring in rings {
            let vertices: Vec<Enu> = ring
                .ring
                .iter()
                .map(|p| geo_to_local_enu(GeoPos::new(p.lat, p.lon, 0.0), origin))
                .collect();
            aerodrome.add_element(area, ring.name.clone(), Polygon::new(vertices))?;
        }
    }

    Ok((aerodrome, origin))
}

/// Track number assigned to the single DGPS-equipped ground vehicle.
const DGPS_TRACK_NUMBER: u16 = 1;

/// Read a tabular DGPS reference file (DGPS mode only): one record per
/// line, comma-separated `timestamp,lat,lon,alt[,speed,heading]`, with
/// `timestamp` in RFC 3339 and angles in degrees, converted to a reference
/// Track keyed by `target_address`. Speed and heading columns, if present,
/// are accepted but not retained.
pub fn read_dgps_track(path: &Path, target_address: ModeS, origin: GeoPos) -> Result<Track> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut track = Track::new(SystemType::Dgps, DGPS_TRACK_NUMBER);
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let malformed = || CliError::MalformedDgpsRecord {
            path: path.to_path_buf(),
            line: idx + 1,
        };
        if fields.len() < 4 {
            return Err(malformed());
        }
        let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(fields[0])
            .map_err(|_| malformed())?
            .with_timezone(&Utc);
        let lat: f64 = fields[1].parse().map_err(|_| malformed())?;
        let lon: f64 = fields[2].parse().map_err(|_| malformed())?;
        let alt: f64 = fields[3].parse().map_err(|_| malformed())?;

        let position = geo_to_local_enu(GeoPos::new(lat, lon, alt), origin);
        let mut report = TargetReport::new(
            SystemType::Dgps,
            DataSourceId::new(0, 0),
            timestamp,
            DGPS_TRACK_NUMBER,
            position,
            true,
        );
        report.mode_s = Some(target_address);
        track.insert(report);
    }
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_dgps_reference_records_into_a_single_track() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment line is ignored").unwrap();
        writeln!(file, "2020-05-05T00:00:00Z,40.0,-3.0,600.0,2.0,90.0").unwrap();
        writeln!(file, "2020-05-05T00:00:01Z,40.0001,-3.0,600.0,2.0,90.0").unwrap();

        let origin = GeoPos::new(40.0, -3.0, 600.0);
        let track = read_dgps_track(file.path(), 0xABCDEF, origin).unwrap();

        assert_eq!(track.len(), 2);
        assert_eq!(track.mode_s(), Some(0xABCDEF));
        assert_eq!(track.system_type, SystemType::Dgps);
    }

    #[test]
    fn rejects_malformed_dgps_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not-enough-fields").unwrap();

        let origin = GeoPos::new(40.0, -3.0, 600.0);
        assert!(read_dgps_track(file.path(), 0xABCDEF, origin).is_err());
    }
}
