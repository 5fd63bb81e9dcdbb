use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

use super::queries::geodesic_distance;

/// WGS84 position as sent by the routing service
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Geodesic distance to `other` in meters
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        geodesic_distance(self.to_point(), other.to_point())
    }

    /// Whether latitude and longitude lie within their valid ranges.
    ///
    /// Decoding does not check this; the service is trusted.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `geo` points are (x = longitude, y = latitude)
    pub fn to_point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

impl From<Coordinate> for Point {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.to_point()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
