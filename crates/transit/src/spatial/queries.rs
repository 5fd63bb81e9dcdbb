//! Distance calculations between points on Earth's surface.
//!
//! Leg and connection distances use the geodesic (WGS84 ellipsoid) distance.
//! Haversine is kept for cheap approximate comparisons.

use geo::{GeodesicDistance, HaversineDistance, Point};

/// Calculate geodesic distance between two points in meters
pub fn geodesic_distance(p1: Point, p2: Point) -> f64 {
    p1.geodesic_distance(&p2)
}

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geodesic_distance() {
        // Zürich HB to Bern, roughly 96 km as the crow flies
        let zurich = Point::new(8.540192, 47.378177);
        let bern = Point::new(7.439131, 46.948832);

        let dist = geodesic_distance(zurich, bern);
        assert!((dist - 96_000.0).abs() < 2_000.0);
    }

    #[test]
    fn test_distance_agrees_with_haversine() {
        let nyc = Point::new(-74.0060, 40.7128);
        let la = Point::new(-118.2437, 34.0522);

        let geodesic = geodesic_distance(nyc, la);
        let haversine = haversine_distance(nyc, la);
        assert!((geodesic - 3_936_000.0).abs() < 50_000.0);
        assert!((geodesic - haversine).abs() / geodesic < 0.01);
    }

    #[test]
    fn test_zero_distance() {
        let p = Point::new(8.5, 47.3);
        assert_eq!(geodesic_distance(p, p), 0.0);
    }
}
