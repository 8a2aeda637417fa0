use super::{Ecef, Vec3};

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);
/// WGS84 second eccentricity squared.
pub const WGS84_EP2: f64 = (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);

/// Geodetic coordinates in radians and meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geodetic {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
}

impl Geodetic {
    pub fn new(lat_rad: f64, lon_rad: f64, alt_m: f64) -> Self {
        Self {
            lat_rad,
            lon_rad,
            alt_m,
        }
    }
}

pub fn geodetic_to_ecef(geo: Geodetic) -> Ecef {
    let (sin_lat, cos_lat) = geo.lat_rad.sin_cos();
    let (sin_lon, cos_lon) = geo.lon_rad.sin_cos();

    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    Ecef::new(
        (n + geo.alt_m) * cos_lat * cos_lon,
        (n + geo.alt_m) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + geo.alt_m) * sin_lat,
    )
}

/// Bowring's closed-form inverse; sub-millimeter near the surface.
pub fn ecef_to_geodetic(ecef: Ecef) -> Geodetic {
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let lon = ecef.y.atan2(ecef.x);

    let theta = (ecef.z * WGS84_A).atan2(p * WGS84_B);
    let (sin_theta, cos_theta) = theta.sin_cos();

    let lat = (ecef.z + WGS84_EP2 * WGS84_B * sin_theta.powi(3))
        .atan2(p - WGS84_E2 * WGS84_A * cos_theta.powi(3));

    let sin_lat = lat.sin();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let alt = if lat.cos().abs() > 1e-12 {
        p / lat.cos() - n
    } else {
        ecef.z.abs() - WGS84_B
    };

    Geodetic::new(lat, lon, alt)
}

/// Point where a ray from the Earth's center along `dir` meets the ellipsoid.
pub fn ellipsoid_point_along(dir: Vec3) -> Option<Ecef> {
    let d = dir.normalize()?;
    let k = (d.x * d.x + d.y * d.y) / (WGS84_A * WGS84_A) + (d.z * d.z) / (WGS84_B * WGS84_B);
    Some(Ecef::from(d.scale(1.0 / k.sqrt())))
}

/// East/north/up unit vectors at a geodetic location.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnuFrame {
    pub east: Vec3,
    pub north: Vec3,
    pub up: Vec3,
}

impl EnuFrame {
    pub fn at(lat_rad: f64, lon_rad: f64) -> Self {
        let (sin_lat, cos_lat) = lat_rad.sin_cos();
        let (sin_lon, cos_lon) = lon_rad.sin_cos();
        Self {
            east: Vec3::new(-sin_lon, cos_lon, 0.0),
            north: Vec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat),
            up: Vec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
        }
    }

    /// Combines local components into an ECEF-aligned direction.
    pub fn to_world(&self, east: f64, north: f64, up: f64) -> Vec3 {
        self.east.scale(east) + self.north.scale(north) + self.up.scale(up)
    }
}
