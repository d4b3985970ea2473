//! Incident density on a regular lat/lon grid

use crate::spatial::{Point, PointSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One non-empty grid cell of a density layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityCell {
    /// Row index, counted from the southern edge
    pub row: usize,

    /// Column index, counted from the western edge
    pub col: usize,

    /// Middle of the cell
    pub center: Point,

    /// Incidents falling in the cell
    pub count: usize,

    /// `count` relative to the densest cell, in (0, 1]
    pub weight: f64,
}

/// Bin points onto a `cells_per_side` x `cells_per_side` grid spanning their
/// bounding box.
///
/// Only cells holding at least one point are returned, ordered by row then
/// column. Points on the northern or eastern edge land in the last row or
/// column. A zero-width span collapses to a single row or column.
pub fn density_grid(points: &PointSet, cells_per_side: usize) -> Vec<DensityCell> {
    let (sw, ne) = match points.bounds() {
        Some(bounds) if cells_per_side > 0 => bounds,
        _ => return Vec::new(),
    };

    let lat_span = ne.lat - sw.lat;
    let lon_span = ne.lon - sw.lon;
    let cells = cells_per_side as f64;

    let bin = |offset: f64, span: f64| -> usize {
        if span > 0.0 {
            ((offset / span * cells).floor() as usize).min(cells_per_side - 1)
        } else {
            0
        }
    };

    let counts = points
        .iter()
        .map(|p| (bin(p.lat - sw.lat, lat_span), bin(p.lon - sw.lon, lon_span)))
        .counts();

    let max_count = counts.values().copied().max().unwrap_or(1) as f64;

    counts
        .into_iter()
        .sorted_unstable_by_key(|&(cell, _)| cell)
        .map(|((row, col), count)| DensityCell {
            row,
            col,
            center: Point::new(
                sw.lat + (row as f64 + 0.5) * lat_span / cells,
                sw.lon + (col as f64 + 0.5) * lon_span / cells,
            ),
            count,
            weight: count as f64 / max_count,
        })
        .collect()
}
