//! Aerodrome surface model and point-in-polygon area tagging.

use std::collections::HashMap;

use crate::area::{Area, NamedArea};
use crate::error::{CoreError, CoreErrorKind, Result};
use crate::geo::Enu;

/// A closed ring of ENU vertices (first vertex equals last).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Enu>,
}

impl Polygon {
    pub fn new(vertices: Vec<Enu>) -> Self {
        Self { vertices }
    }

    fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(a), Some(b)) => (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            _ => false,
        }
    }

    /// Odd-even (even-odd) fill rule point-in-polygon test, ignoring z.
    fn contains(&self, x: f64, y: f64) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = &self.vertices[i];
            let vj = &self.vertices[j];
            let crosses = (vi.y > y) != (vj.y > y);
            if crosses {
                let x_intersect = (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x;
                if x < x_intersect {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Named polygon entries for one area kind: `name -> polygons sharing that
/// name` (a stand, taxiway, etc. can be split into multiple disjoint rings).
type AreaCollection = HashMap<String, Vec<Polygon>>;

/// An aerodrome's reference point and per-area-kind polygon collections, all
/// expressed in local ENU meters relative to the reference point.
#[derive(Debug, Clone, Default)]
pub struct Aerodrome {
    runway: AreaCollection,
    taxiway: AreaCollection,
    apron_lane: AreaCollection,
    stand: AreaCollection,
    airborne1: AreaCollection,
    airborne2: AreaCollection,
}

/// Surface reports at or below this altitude (meters) are eligible for the
/// Airborne1/Airborne2 layers; above it they stay unmatched.
const AIRBORNE_ALTITUDE_GATE_M: f64 = 762.0;

impl Aerodrome {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection_mut(&mut self, area: Area) -> &mut AreaCollection {
        match area {
            Area::RUNWAY => &mut self.runway,
            Area::TAXIWAY => &mut self.taxiway,
            Area::APRON_LANE => &mut self.apron_lane,
            Area::STAND => &mut self.stand,
            Area::AIRBORNE1 => &mut self.airborne1,
            Area::AIRBORNE2 => &mut self.airborne2,
            _ => panic!("not a leaf area: {area}"),
        }
    }

    /// Add a named polygon to a leaf area collection, validating that it is
    /// non-empty and closed.
    pub fn add_element(&mut self, area: Area, name: impl Into<String>, polygon: Polygon) -> Result<()> {
        let name = name.into();
        if polygon.vertices.is_empty() {
            return Err(CoreError(CoreErrorKind::EmptyPolygon {
                area: area.to_string(),
                name,
            }));
        }
        if !polygon.is_closed() {
            return Err(CoreError(CoreErrorKind::UnclosedPolygon {
                area: area.to_string(),
                name,
            }));
        }
        self.collection_mut(area).entry(name).or_default().push(polygon);
        Ok(())
    }

    pub fn has_any_elements(&self) -> bool {
        [
            &self.runway,
            &self.taxiway,
            &self.apron_lane,
            &self.stand,
            &self.airborne1,
            &self.airborne2,
        ]
        .iter()
        .any(|c| !c.is_empty())
    }

    fn collection(&self, area: Area) -> &AreaCollection {
        match area {
            Area::RUNWAY => &self.runway,
            Area::TAXIWAY => &self.taxiway,
            Area::APRON_LANE => &self.apron_lane,
            Area::STAND => &self.stand,
            Area::AIRBORNE1 => &self.airborne1,
            Area::AIRBORNE2 => &self.airborne2,
            _ => panic!("not a leaf area: {area}"),
        }
    }

    fn first_containing(&self, area: Area, x: f64, y: f64) -> Option<NamedArea> {
        self.collection(area).iter().find_map(|(name, polygons)| {
            polygons
                .iter()
                .any(|p| p.contains(x, y))
                .then(|| NamedArea::new(area, name.clone()))
        })
    }

    /// Locate a point on the aerodrome surface (or in the gated airspace
    /// above it), returning the first matching named area or `NamedArea::none()`.
    pub fn locate_point(&self, pos: Enu, on_ground: bool) -> NamedArea {
        assert!(self.has_any_elements(), "aerodrome has no geometry loaded");

        let order: &[Area] = if on_ground {
            &[Area::RUNWAY, Area::TAXIWAY, Area::APRON_LANE, Area::STAND]
        } else {
            if pos.z.unwrap_or(0.0) > AIRBORNE_ALTITUDE_GATE_M {
                return NamedArea::none();
            }
            &[Area::AIRBORNE1, Area::AIRBORNE2]
        };

        for area in order {
            if let Some(found) = self.first_containing(*area, pos.x, pos.y) {
                return found;
            }
        }
        NamedArea::none()
    }
}
