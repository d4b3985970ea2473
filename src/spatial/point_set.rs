//! Immutable collections of incident locations

use crate::spatial::Point;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Ordered, immutable sequence of incident locations.
///
/// Built once per analysis request. The partitioner only reads it and
/// reports a cluster label per index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Borrow the points in order
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Mean position of all points, used as the initial map view
    pub fn center(&self) -> Option<Point> {
        Point::mean(&self.points)
    }

    /// Bounding box as (south-west, north-east) corners
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.points.first()?;
        let (mut sw, mut ne) = (first, first);

        for p in &self.points[1..] {
            sw.lat = sw.lat.min(p.lat);
            sw.lon = sw.lon.min(p.lon);
            ne.lat = ne.lat.max(p.lat);
            ne.lon = ne.lon.max(p.lon);
        }

        Some((sw, ne))
    }
}

impl Index<usize> for PointSet {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// Builder for incrementally assembling a PointSet from raw rows.
///
/// Rows missing either coordinate, or carrying a non-finite one, never make
/// it into the set; they are only counted.
#[derive(Debug, Default)]
pub struct PointSetBuilder {
    points: Vec<Point>,
    dropped: usize,
}

impl PointSetBuilder {
    /// Create a new builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            dropped: 0,
        }
    }

    /// Add a row, keeping it only if both coordinates are present and finite
    pub fn push(&mut self, lat: Option<f64>, lon: Option<f64>) -> bool {
        match (lat, lon) {
            (Some(lat), Some(lon)) => match Point::try_new(lat, lon) {
                Some(p) => {
                    self.points.push(p);
                    true
                }
                None => {
                    self.dropped += 1;
                    false
                }
            },
            _ => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Number of rows rejected so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Finish building
    pub fn build(self) -> PointSet {
        PointSet {
            points: self.points,
        }
    }
}
