//! Concrete minimum-field schemas for each (category, record type)
//! combination, built on top of `asterix_record`'s generic mandatory/
//! disjunctive schema checker.

use asterix_record::FieldSchema;
use astmops_core::types::SystemType;

/// CAT10 service messages (north marker, sector crossing, periodic status).
pub fn cat10_service_message() -> FieldSchema {
    FieldSchema::new().mandatory(&["I000", "I010", "I140", "I550"])
}

/// CAT10 target reports, keyed by the SIC-derived system type.
pub fn cat10_target_report(system: SystemType) -> FieldSchema {
    match system {
        SystemType::Smr => FieldSchema::new()
            .mandatory(&["I000", "I010", "I020", "I140", "I161", "I270"])
            .disjunctive(&["I040", "I041", "I042"]),
        SystemType::Mlat => FieldSchema::new()
            .mandatory(&["I000", "I010", "I020", "I140", "I161", "I220"])
            .disjunctive(&["I041", "I042"])
            .disjunctive(&["I060", "I245"]),
        _ => FieldSchema::new(),
    }
}

/// CAT21 target reports. The distilled ASTERIX UAP does not define a
/// minimum set beyond what stage B's extractor itself requires, so this
/// schema is defined explicitly here from the fields the extractor reads:
/// data-source id, ground bit, target address, and track number are
/// mandatory; at least one latitude/longitude source must be present.
pub fn cat21_target_report() -> FieldSchema {
    FieldSchema::new()
        .mandatory(&["I010", "I040", "I080", "I161"])
        .disjunctive(&["I130", "I131"])
}
