use serde::{Deserialize, Serialize};

use super::Geodetic;

/// Geographic position in degrees and meters above the ellipsoid.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Clamps latitude to [-90, 90] and wraps longitude into [-180, 180].
    pub fn normalized(self) -> Self {
        let mut lon = (self.longitude + 180.0).rem_euclid(360.0) - 180.0;
        if lon == -180.0 && self.longitude > 0.0 {
            lon = 180.0;
        }
        Self {
            latitude: self.latitude.clamp(-90.0, 90.0),
            longitude: lon,
            altitude: self.altitude,
        }
    }

    pub fn to_geodetic(self) -> Geodetic {
        Geodetic::new(
            self.latitude.to_radians(),
            self.longitude.to_radians(),
            self.altitude,
        )
    }
}

impl From<Geodetic> for Position {
    fn from(geo: Geodetic) -> Self {
        Self::new(geo.lat_rad.to_degrees(), geo.lon_rad.to_degrees(), geo.alt_m)
    }
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn normalized_wraps_longitude() {
        let p = Position::new(95.0, 190.0, 10.0).normalized();
        assert_eq!(p.latitude, 90.0);
        assert!((p.longitude - -170.0).abs() < 1e-9);
        assert_eq!(p.altitude, 10.0);

        let east = Position::new(0.0, 180.0, 0.0).normalized();
        assert_eq!(east.longitude, 180.0);
    }

    #[test]
    fn geodetic_round_trip_degrees() {
        let p = Position::new(34.2, -119.2, 50_000.0);
        let back = Position::from(p.to_geodetic());
        assert!((back.latitude - p.latitude).abs() < 1e-12);
        assert!((back.longitude - p.longitude).abs() < 1e-12);
        assert_eq!(back.altitude, p.altitude);
    }
}
