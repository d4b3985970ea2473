//! Planar coordinate pairs

use serde::{Deserialize, Serialize};

/// An incident location as (latitude, longitude).
///
/// Both coordinates are expected to be finite. [`Point::new`] does not check;
/// use [`Point::try_new`] for values that come from untrusted input. The
/// partitioner rejects non-finite points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    /// Create a point from coordinates known to be finite
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a point, rejecting NaN and infinite coordinates
    pub fn try_new(lat: f64, lon: f64) -> Option<Self> {
        if lat.is_finite() && lon.is_finite() {
            Some(Self { lat, lon })
        } else {
            None
        }
    }

    /// Squared Euclidean distance in coordinate space
    #[inline]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    /// Euclidean distance in coordinate space
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Arithmetic mean of a non-empty sequence of points
    pub fn mean<'a, I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut lat = 0.0;
        let mut lon = 0.0;
        let mut n = 0usize;

        for p in points {
            lat += p.lat;
            lon += p.lon;
            n += 1;
        }

        if n == 0 {
            return None;
        }

        Some(Point::new(lat / n as f64, lon / n as f64))
    }
}

impl From<(f64, f64)> for Point {
    fn from((lat, lon): (f64, f64)) -> Self {
        Point::new(lat, lon)
    }
}
