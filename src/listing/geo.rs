use std::fmt;

use crate::models::restaurant::Coordinate;

/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two coordinates.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat_from = from.lat.to_radians();
    let lat_to = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_long = (to.long - from.long).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_long / 2.0).sin().powi(2);
    // rounding can push `a` past 1 for near-antipodal points
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// `None` stands for an unknown distance: either side has no coordinate.
pub fn distance_km(from: Option<Coordinate>, to: Option<Coordinate>) -> Option<f64> {
    match (from, to) {
        (Some(from), Some(to)) => Some(haversine_km(from, to)),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum DistanceBucket {
    Nearby,
    #[value(name = "1km")]
    OneKm,
    #[value(name = "3km")]
    ThreeKm,
    #[value(name = "5km")]
    FiveKm,
}

impl DistanceBucket {
    pub fn radius_km(&self) -> f64 {
        match self {
            DistanceBucket::Nearby | DistanceBucket::OneKm => 1.0,
            DistanceBucket::ThreeKm => 3.0,
            DistanceBucket::FiveKm => 5.0,
        }
    }

    pub fn contains(&self, distance_km: f64) -> bool {
        distance_km <= self.radius_km()
    }
}

impl fmt::Display for DistanceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DistanceBucket::Nearby => "nearby",
            DistanceBucket::OneKm => "1km",
            DistanceBucket::ThreeKm => "3km",
            DistanceBucket::FiveKm => "5km",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONAS: Coordinate = Coordinate { lat: -6.1754, long: 106.8272 };
    const BUNDARAN_HI: Coordinate = Coordinate { lat: -6.1950, long: 106.8230 };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(MONAS, MONAS), 0.0);
        assert_eq!(distance_km(Some(BUNDARAN_HI), Some(BUNDARAN_HI)), Some(0.0));
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(MONAS, BUNDARAN_HI);
        let back = haversine_km(BUNDARAN_HI, MONAS);

        assert!((there - back).abs() < 1e-12);
    }

    #[test]
    fn distance_matches_known_value() {
        // Roughly 2.2 km between the two landmarks.
        let distance = haversine_km(MONAS, BUNDARAN_HI);

        assert!(distance > 2.0 && distance < 2.4, "{}", distance);
    }

    #[test]
    fn antipodal_points_stay_finite() {
        for step in 0..200 {
            let lat = -89.0 + step as f64 * 0.89;
            let long = -179.0 + step as f64 * 1.3;
            let from = Coordinate { lat, long };
            let to = Coordinate { lat: -lat, long: long + 180.0 };

            let distance = haversine_km(from, to);

            assert!(distance.is_finite(), "{:?} -> {:?} gave {}", from, to, distance);
            assert!(distance <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }

    #[test]
    fn unknown_when_either_side_is_missing() {
        assert_eq!(distance_km(None, Some(MONAS)), None);
        assert_eq!(distance_km(Some(MONAS), None), None);
        assert_eq!(distance_km(None, None), None);
    }

    #[test]
    fn nearby_and_one_km_share_a_radius() {
        assert_eq!(DistanceBucket::Nearby.radius_km(), DistanceBucket::OneKm.radius_km());
        assert!(DistanceBucket::ThreeKm.contains(3.0));
        assert!(!DistanceBucket::ThreeKm.contains(3.01));
    }
}
