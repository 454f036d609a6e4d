//! Great-circle distance math and the service-area containment check used by
//! request intake and donor discovery.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometers.
///
/// Uses the atan2 formulation so rounding near identical or antipodal points
/// cannot push the argument outside the arcsine domain.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Render a distance for display: meters below one kilometer, otherwise
/// kilometers with a single decimal.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{km:.1} km")
    }
}

/// Rectangular latitude/longitude bounds for a service country.
///
/// This is a deliberate approximation: a bounding box, not a border polygon.
/// It exists to reject hospital pins that are obviously outside the country,
/// not to adjudicate border cases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Approximate bounding box for Mexico.
pub const MEXICO: CountryBounds = CountryBounds {
    north: 32.72,
    south: 14.53,
    east: -86.71,
    west: -118.45,
};

impl CountryBounds {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_zero_for_identical_points() {
        assert_eq!(distance_km(19.4326, -99.1332, 19.4326, -99.1332), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let forward = distance_km(19.4326, -99.1332, 25.6866, -100.3161);
        let backward = distance_km(25.6866, -100.3161, 19.4326, -99.1332);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn distance_matches_mexico_city_fixture() {
        // Zócalo to Centro Nacional de la Transfusión Sanguínea.
        let km = distance_km(19.4326, -99.1332, 19.5034, -99.1476);
        assert!((7.9..=8.1).contains(&km), "got {km}");
    }

    #[test]
    fn distance_survives_near_antipodal_points() {
        let km = distance_km(0.0, 0.0, 0.0, 180.0);
        assert!(km.is_finite());
        assert!((km - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1.0);
    }

    #[test]
    fn short_distances_render_as_meters() {
        assert_eq!(format_distance(0.5), "500 m");
        assert_eq!(format_distance(0.0449), "45 m");
    }

    #[test]
    fn long_distances_render_as_kilometers() {
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(12.34), "12.3 km");
    }

    #[test]
    fn mexico_bounds_accept_interior_points() {
        assert!(MEXICO.contains(19.4326, -99.1332)); // Mexico City
        assert!(MEXICO.contains(25.6866, -100.3161)); // Monterrey
    }

    #[test]
    fn mexico_bounds_reject_exterior_points() {
        assert!(!MEXICO.contains(40.7128, -74.0060)); // New York
        assert!(!MEXICO.contains(4.7110, -74.0721)); // Bogotá
    }
}
