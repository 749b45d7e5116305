//! Energy Drops
//!
//! World-placed collectibles worth a few credits each. Drops exist outside
//! the category accrual caps; a separate daily allowance bounds how much the
//! drop economy can pay out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::DropId;

/// Mean earth radius in meters, for haversine distance
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on the globe in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another point, in meters (haversine)
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

/// A collectible credit drop placed at a location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyDrop {
    /// Drop ID
    pub id: DropId,

    /// Where the drop sits
    pub location: GeoPoint,

    /// Credits granted on collection
    pub value: u64,

    /// When the drop was placed
    pub created_at: DateTime<Utc>,
}

impl EnergyDrop {
    /// Place a drop with a fresh ID
    pub fn new(location: GeoPoint, value: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: DropId::generate(),
            location,
            value,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = GeoPoint::new(48.8584, 2.2945);
        assert!(p.distance_meters(&p) < 1e-6);
    }

    #[test]
    fn test_distance_known_pair() {
        // Two Paris landmarks about 1.7 km apart.
        let eiffel = GeoPoint::new(48.8584, 2.2945);
        let arc = GeoPoint::new(48.8738, 2.2950);

        let d = eiffel.distance_meters(&arc);
        assert!(d > 1_600.0 && d < 1_800.0, "unexpected distance {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(10.5, 20.5);
        let ab = a.distance_meters(&b);
        let ba = b.distance_meters(&a);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_new_drop_carries_value_and_time() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let drop = EnergyDrop::new(GeoPoint::new(0.0, 0.0), 5, now);

        assert_eq!(drop.value, 5);
        assert_eq!(drop.created_at, now);
        assert!(drop.id.as_str().starts_with("drop:"));
    }
}
