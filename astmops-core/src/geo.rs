//! WGS-84 geodesy: geographic coordinates to local east-north-up (ENU)
//! meters relative to an aerodrome reference point.

const WGS84_A: f64 = 6378137.0;
const WGS84_E2: f64 = 0.00669437999013;

/// A point in local ENU meters. `z` is `None` for surface-only reports
/// with no altitude source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enu {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Enu {
    pub fn new(x: f64, y: f64, z: Option<f64>) -> Self {
        Self { x, y, z }
    }
}

/// A geographic position in degrees and meters above the ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPos {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
}

impl GeoPos {
    pub fn new(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
        }
    }
}

/// WGS-84 prime-vertical (transverse) radius of curvature at a given
/// latitude, in radians.
fn wgs84_transverse_radius(lat_rad: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * lat_rad.sin().powi(2)).sqrt()
}

/// Geographic coordinates to earth-centered earth-fixed (ECEF) meters.
fn geo_to_ecef(pos: GeoPos) -> (f64, f64, f64) {
    let lat = pos.lat_deg.to_radians();
    let lon = pos.lon_deg.to_radians();
    let n = wgs84_transverse_radius(lat);

    let x = (n + pos.alt_m) * lat.cos() * lon.cos();
    let y = (n + pos.alt_m) * lat.cos() * lon.sin();
    let z = (n * (1.0 - WGS84_E2) + pos.alt_m) * lat.sin();
    (x, y, z)
}

/// ECEF meters to local ENU meters relative to an ECEF origin at `origin`.
fn ecef_to_local_enu(x: f64, y: f64, z: f64, origin: GeoPos) -> Enu {
    let (ox, oy, oz) = geo_to_ecef(origin);
    let (dx, dy, dz) = (x - ox, y - oy, z - oz);

    let lat = origin.lat_deg.to_radians();
    let lon = origin.lon_deg.to_radians();
    let (sin_phi, cos_phi) = (lat.sin(), lat.cos());
    let (sin_lambda, cos_lambda) = (lon.sin(), lon.cos());

    let e = -sin_lambda * dx + cos_lambda * dy;
    let n = -sin_phi * cos_lambda * dx - sin_phi * sin_lambda * dy + cos_phi * dz;
    let u = cos_phi * cos_lambda * dx + cos_phi * sin_lambda * dy + sin_phi * dz;

    Enu::new(e, n, Some(u))
}

/// Geographic coordinates to local ENU meters relative to `origin`.
pub fn geo_to_local_enu(pos: GeoPos, origin: GeoPos) -> Enu {
    let (x, y, z) = geo_to_ecef(pos);
    ecef_to_local_enu(x, y, z, origin)
}

/// Straight-line (2D) Euclidean distance between two ENU points.
pub fn euclidean_distance_2d(a: Enu, b: Enu) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_zero() {
        let arp = GeoPos::new(40.0, -3.0, 600.0);
        let enu = geo_to_local_enu(arp, arp);
        assert!(enu.x.abs() < 1e-6);
        assert!(enu.y.abs() < 1e-6);
        assert!(enu.z.unwrap().abs() < 1e-6);
    }

    #[test]
    fn north_offset_is_positive_y() {
        let arp = GeoPos::new(40.0, -3.0, 0.0);
        let north = GeoPos::new(40.001, -3.0, 0.0);
        let enu = geo_to_local_enu(north, arp);
        assert!(enu.y > 0.0);
        assert!(enu.x.abs() < 1.0);
    }

    #[test]
    fn east_offset_is_positive_x() {
        let arp = GeoPos::new(40.0, -3.0, 0.0);
        let east = GeoPos::new(40.0, -2.999, 0.0);
        let enu = geo_to_local_enu(east, arp);
        assert!(enu.x > 0.0);
        assert!(enu.y.abs() < 1.0);
    }

    #[test]
    fn euclidean_distance_pythagoras() {
        let a = Enu::new(0.0, 0.0, Some(0.0));
        let b = Enu::new(3.0, 4.0, Some(100.0));
        assert!((euclidean_distance_2d(a, b) - 5.0).abs() < 1e-9);
    }
}
