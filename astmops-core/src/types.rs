//! Sensor/message classification types shared by every stage.

use std::fmt;

/// Identifies the physical sensor emitting a record: (SAC, SIC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataSourceId {
    pub sac: u8,
    pub sic: u8,
}

impl DataSourceId {
    pub fn new(sac: u8, sic: u8) -> Self {
        Self { sac, sic }
    }
}

impl fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sac, self.sic)
    }
}

/// The sensor (or reference) system a record/track/report originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemType {
    Unknown,
    Smr,
    Mlat,
    Adsb,
    Dgps,
}

impl SystemType {
    /// A test system (evaluated against a reference) per the associator.
    pub fn is_test(self) -> bool {
        matches!(self, SystemType::Smr | SystemType::Mlat)
    }

    /// A reference system (ground truth) per the associator.
    pub fn is_reference(self) -> bool {
        matches!(self, SystemType::Adsb | SystemType::Dgps)
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SystemType::Unknown => "Unknown",
            SystemType::Smr => "Smr",
            SystemType::Mlat => "Mlat",
            SystemType::Adsb => "Adsb",
            SystemType::Dgps => "Dgps",
        };
        f.write_str(s)
    }
}

/// What kind of thing a record represents once classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Unknown,
    TargetReport,
    ServiceMessage,
}

/// The pair (SystemType, MessageType) a classified record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordType {
    pub system: SystemType,
    pub message: MessageType,
}

impl RecordType {
    pub fn new(system: SystemType, message: MessageType) -> Self {
        Self { system, message }
    }

    pub fn is_known(&self) -> bool {
        self.system != SystemType::Unknown && self.message != MessageType::Unknown
    }
}

/// A 24-bit Mode-S aircraft address.
pub type ModeS = u32;

/// A 12-bit octal Mode-3A code.
pub type Mode3A = u16;

/// A per-sensor track number.
pub type TrackNum = u16;
