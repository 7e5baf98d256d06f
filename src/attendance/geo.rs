//! Geofencing math: client coordinates and great-circle distance.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 point as sent by the client. Untrusted until `is_valid`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    #[schema(example = -7.052683)]
    pub lat: f64,
    #[schema(example = 110.469375)]
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the valid latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance between two points in meters (haversine).
///
/// Good to well under a meter at geofence scale; the atan2 form stays
/// numerically stable for near-zero and antipodal separations.
pub fn distance_meters(from: Coordinates, to: Coordinates) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let dphi = (to.lat - from.lat).to_radians();
    let dlambda = (to.lng - from.lng).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFICE: Coordinates = Coordinates {
        lat: -7.052683,
        lng: 110.469375,
    };

    #[test]
    fn zero_distance_to_self() {
        assert_eq!(distance_meters(OFFICE, OFFICE), 0.0);
    }

    #[test]
    fn short_hops_match_precomputed_values() {
        // Offsets checked against an independent haversine implementation.
        let fifty = Coordinates::new(-7.052233, 110.469375);
        let d = distance_meters(OFFICE, fifty);
        assert!((d - 50.04).abs() < 0.1, "got {d}");

        let ninety_nine = Coordinates::new(-7.052683, 110.470275);
        let d = distance_meters(OFFICE, ninety_nine);
        assert!((d - 99.32).abs() < 0.1, "got {d}");

        let one_fifty = Coordinates::new(-7.051333, 110.469375);
        let d = distance_meters(OFFICE, one_fifty);
        assert!((d - 150.11).abs() < 0.1, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(-7.0326830, 110.469375);
        let d1 = distance_meters(OFFICE, a);
        let d2 = distance_meters(a, OFFICE);
        assert!((d1 - d2).abs() < 1e-9);
        assert!((d1 - 2223.9).abs() < 0.5, "got {d1}");
    }

    #[test]
    fn validity_bounds() {
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(Coordinates::new(90.0, -180.0).is_valid());
        assert!(!Coordinates::new(90.01, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, f64::INFINITY).is_valid());
    }
}
