//! Aerodrome surface area bitset and named-area tagging.

use std::fmt;

/// Bitfield partitioning the aerodrome surface (and airspace) into leaf
/// areas plus derived groups, built by OR-ing leaf bits together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Area(u16);

impl Area {
    pub const NONE: Area = Area(0);
    pub const AIRBORNE1: Area = Area(0x1);
    pub const AIRBORNE2: Area = Area(0x2);
    pub const RUNWAY: Area = Area(0x100);
    pub const TAXIWAY: Area = Area(0x200);
    pub const STAND: Area = Area(0x1000);
    pub const APRON_LANE: Area = Area(0x2000);

    pub const MANOEUVERING: Area = Area(Self::RUNWAY.0 | Self::TAXIWAY.0);
    pub const APRON: Area = Area(Self::STAND.0 | Self::APRON_LANE.0);
    pub const GROUND: Area = Area(Self::MANOEUVERING.0 | Self::APRON.0);
    pub const MOVEMENT: Area = Self::GROUND;
    pub const AIRBORNE: Area = Area(Self::AIRBORNE1.0 | Self::AIRBORNE2.0);
    pub const ALL: Area = Area(Self::GROUND.0 | Self::AIRBORNE.0);

    pub fn bits(self) -> u16 {
        self.0
    }

    /// An area "belongs to" a group iff it is non-empty and every bit it
    /// sets is also set in the group: `area & group == area`, equivalently
    /// `area | group == group`. Both read as "group contains area."
    pub fn belongs_to(self, group: Area) -> bool {
        self != Area::NONE && (self.0 | group.0) == group.0
    }
}

impl std::ops::BitOr for Area {
    type Output = Area;
    fn bitor(self, rhs: Area) -> Area {
        Area(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for Area {
    type Output = Area;
    fn bitand(self, rhs: Area) -> Area {
        Area(self.0 & rhs.0)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Area::NONE => "None",
            Area::AIRBORNE1 => "Airborne1",
            Area::AIRBORNE2 => "Airborne2",
            Area::RUNWAY => "Runway",
            Area::TAXIWAY => "Taxiway",
            Area::STAND => "Stand",
            Area::APRON_LANE => "ApronLane",
            Area::MANOEUVERING => "Manoeuvering",
            Area::APRON => "Apron",
            Area::GROUND => "Ground",
            Area::AIRBORNE => "Airborne",
            Area::ALL => "All",
            _ => "Mixed",
        };
        f.write_str(name)
    }
}

/// The leaf area groups reports are ever tagged with directly (never the
/// derived groups — those only appear in reporting roll-ups).
pub const LEAF_AREAS: [Area; 6] = [
    Area::RUNWAY,
    Area::TAXIWAY,
    Area::APRON_LANE,
    Area::STAND,
    Area::AIRBORNE1,
    Area::AIRBORNE2,
];

/// The group areas used when rolling leaf-area counters up for reporting.
pub const GROUP_AREAS: [Area; 4] = [Area::MANOEUVERING, Area::APRON, Area::GROUND, Area::AIRBORNE];

/// A tagged area plus the specific named polygon entry it came from (e.g.
/// Area::STAND with name "Stand 12").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedArea {
    pub area: Area,
    pub name: String,
}

impl NamedArea {
    pub fn new(area: Area, name: impl Into<String>) -> Self {
        Self {
            area,
            name: name.into(),
        }
    }

    pub fn none() -> Self {
        Self {
            area: Area::NONE,
            name: String::new(),
        }
    }

    pub fn full_name(&self) -> String {
        if self.name.is_empty() {
            self.area.to_string()
        } else {
            format!("{}/{}", self.area, self.name)
        }
    }
}
