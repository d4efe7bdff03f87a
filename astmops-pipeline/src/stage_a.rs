//! Stage A — Record Interpreter: classify, field-validate, and
//! timestamp-normalize decoded records.

use std::collections::HashMap;

use asterix_record::Record;
use astmops_core::config::Config;
use astmops_core::types::{DataSourceId, MessageType, RecordType, SystemType};
use astmops_schema::schema;
use chrono::{DateTime, NaiveTime, TimeZone, Timelike, Utc};

/// A record that survived stage A: classified, schema-valid, and carrying
/// an absolute, rollover-corrected UTC timestamp.
#[derive(Debug, Clone)]
pub struct ClassifiedRecord {
    pub record: Record,
    pub record_type: RecordType,
    pub data_source: DataSourceId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default)]
struct RolloverState {
    last_time: Option<DateTime<Utc>>,
    day_count: i64,
}

const DAY_SECS: f64 = 86_400.0;
const ROLLOVER_TOLERANCE_SECS: f64 = 10.0;
const BACKJUMP_TOLERANCE_SECS: f64 = 10.0;
const NEAR_MIDNIGHT_SECS: f64 = 10.0;

/// Drives the per-RecordType midnight-rollover state machine and classifies/
/// validates records one at a time.
pub struct RecordInterpreter<'a> {
    config: &'a Config,
    rollover: HashMap<RecordType, RolloverState>,
}

impl<'a> RecordInterpreter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            rollover: HashMap::new(),
        }
    }

    fn classify_system_type(&self, record: &Record) -> SystemType {
        if record.category == 21 {
            return SystemType::Adsb;
        }
        let Some(sic) = record.get("I010", "SIC").and_then(|e| e.as_u32()) else {
            return SystemType::Unknown;
        };
        let sic = sic as u8;
        if self.config.smr_sics.contains(&sic) {
            SystemType::Smr
        } else if self.config.mlat_sics.contains(&sic) {
            SystemType::Mlat
        } else if self.config.adsb_sics.contains(&sic) {
            SystemType::Adsb
        } else {
            SystemType::Unknown
        }
    }

    fn classify_message_type(&self, record: &Record) -> MessageType {
        if record.category == 21 {
            return MessageType::TargetReport;
        }
        match record.get("I000", "MsgTyp").and_then(|e| e.as_u32()) {
            Some(1) => MessageType::TargetReport,
            Some(2..=4) => MessageType::ServiceMessage,
            _ => MessageType::Unknown,
        }
    }

    /// Cross-check the record's self-reported system-type field (CAT10
    /// I020/TYP) against the SIC-derived classification.
    fn type_field_agrees(&self, record: &Record, system: SystemType) -> bool {
        if record.category != 10 {
            return true;
        }
        match (record.get("I020", "TYP").and_then(|e| e.as_u32()), system) {
            (Some(1), SystemType::Mlat) => true,
            (Some(3), SystemType::Smr) => true,
            (None, _) => true,
            _ => false,
        }
    }

    fn schema_for(&self, record_type: RecordType, category: u8) -> asterix_record::FieldSchema {
        match (category, record_type.message) {
            (10, MessageType::ServiceMessage) => schema::cat10_service_message(),
            (10, MessageType::TargetReport) => schema::cat10_target_report(record_type.system),
            (21, MessageType::TargetReport) => schema::cat21_target_report(),
            _ => asterix_record::FieldSchema::new(),
        }
    }

    fn extract_tod_seconds(&self, record: &Record) -> Option<f64> {
        if record.category == 10 {
            return record.get("I140", "ToD").and_then(|e| e.as_f64());
        }
        // CAT21 cascade: I071 -> I073 (+ I074 correction) -> I077.
        if let Some(tod) = record.get("I071", "ToT").and_then(|e| e.as_f64()) {
            return Some(tod);
        }
        if let Some(tod) = record.get("I073", "ToR").and_then(|e| e.as_f64()) {
            let correction = record.get("I074", "FTR").and_then(|e| e.as_f64()).unwrap_or(0.0);
            return Some(tod + correction);
        }
        record.get("I077", "ToA").and_then(|e| e.as_f64())
    }

    fn absolute_timestamp(&self, tod_secs: f64) -> Option<DateTime<Utc>> {
        let time = NaiveTime::from_num_seconds_from_midnight_opt(
            tod_secs.trunc() as u32 % 86_400,
            ((tod_secs.fract()) * 1_000_000_000.0) as u32,
        )?;
        let naive = self.config.date.and_time(time);
        Some(Utc.from_utc_datetime(&naive))
    }

    /// Apply the midnight-rollover state machine for `record_type`, returning
    /// the corrected timestamp, or `None` if the jump looks invalid.
    fn normalize_timestamp(
        &mut self,
        record_type: RecordType,
        mut candidate: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let state = self.rollover.entry(record_type).or_default();

        let Some(last) = state.last_time else {
            state.last_time = Some(candidate);
            return Some(candidate);
        };

        let delta = (candidate - last).num_milliseconds() as f64 / 1000.0;
        let near_day = delta.abs() >= DAY_SECS - ROLLOVER_TOLERANCE_SECS;
        let last_near_midnight = {
            let secs = last.time().num_seconds_from_midnight() as f64;
            secs >= 86_400.0 - NEAR_MIDNIGHT_SECS
        };
        let candidate_near_midnight = {
            let secs = candidate.time().num_seconds_from_midnight() as f64;
            secs <= NEAR_MIDNIGHT_SECS
        };

        if near_day && delta < 0.0 && last_near_midnight {
            state.day_count += 1;
            candidate += chrono::Duration::days(state.day_count);
            state.last_time = Some(candidate);
            return Some(candidate);
        }
        if near_day && delta > 0.0 && candidate_near_midnight {
            // Delayed pre-rollover sample: belongs to the previous day,
            // does not advance last_time.
            candidate -= chrono::Duration::days(1);
            return Some(candidate);
        }
        if delta.abs() <= BACKJUMP_TOLERANCE_SECS && delta < 0.0 {
            log::warn!("timestamp backjump of {delta:.3}s for {record_type:?}");
            return Some(candidate);
        }

        state.last_time = Some(candidate);
        Some(candidate)
    }

    /// Classify, validate, and timestamp one record. Returns `None` (with a
    /// log line) for any drop reason.
    pub fn process(&mut self, record: Record) -> Option<ClassifiedRecord> {
        if record.category != 10 && record.category != 21 {
            log::debug!("dropping record: unsupported category {}", record.category);
            return None;
        }

        let system = self.classify_system_type(&record);
        let message = self.classify_message_type(&record);
        let record_type = RecordType::new(system, message);

        if !record_type.is_known() {
            log::debug!("dropping record: unclassifiable {record_type:?}");
            return None;
        }
        if record_type.message == MessageType::TargetReport
            && !self.type_field_agrees(&record, system)
        {
            log::debug!("dropping record: TYP field disagrees with SIC classification");
            return None;
        }

        let schema = self.schema_for(record_type, record.category);
        if let Err(violation) = schema.check(&record) {
            log::debug!("dropping record: schema violation: {violation}");
            return None;
        }

        if self.config.processing_mode == astmops_core::config::ProcessingMode::Dgps
            && system == SystemType::Adsb
        {
            log::trace!("dropping ADS-B record: DGPS mode replaces ADS-B reference");
            return None;
        }

        let Some(tod) = self.extract_tod_seconds(&record) else {
            log::debug!("dropping record: no time-of-day field found");
            return None;
        };
        let Some(candidate) = self.absolute_timestamp(tod) else {
            log::debug!("dropping record: invalid time-of-day {tod}");
            return None;
        };
        let timestamp = self.normalize_timestamp(record_type, candidate)?;

        let sac = record.get("I010", "SAC").and_then(|e| e.as_u32()).unwrap_or(0) as u8;
        let sic = record.get("I010", "SIC").and_then(|e| e.as_u32()).unwrap_or(0) as u8;

        Some(ClassifiedRecord {
            record,
            record_type,
            data_source: DataSourceId::new(sac, sic),
            timestamp,
        })
    }
}
