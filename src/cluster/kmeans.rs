//! Coordinate partitioning with Lloyd's k-means
//!
//! Centers are seeded with k-means++ from a fixed-seed ChaCha generator, so
//! the same `(points, k)` always produces the same partition. Empty clusters
//! are repaired after every assignment step by moving the farthest point of
//! a multi-point cluster into them.

use crate::cluster::{Center, ClusterAssignment, Partition};
use crate::config::{Config, DEFAULT_SEED};
use crate::error::{CoreResult, HotspotError};
use crate::spatial::{Point, PointSet};
use log;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Iteration controls for one partitioning run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansConfig {
    /// Hard cap on assign/update iterations
    pub max_iterations: usize,

    /// Largest center movement still considered converged
    pub tolerance: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

impl From<&Config> for KMeansConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }
}

/// Partition `points` into `k` clusters with the default iteration controls
pub fn partition(points: &PointSet, k: usize) -> CoreResult<Partition> {
    partition_with(points, k, &KMeansConfig::default())
}

/// Partition `points` into `k` clusters.
///
/// Fails with `InsufficientData` on an empty set, `InvalidParameter` when
/// `k` is outside `[1, |points|]` and `InvariantViolation` when a point
/// carries a NaN or infinite coordinate. Hitting the iteration cap is not an error;
/// the result reports `converged == false` instead.
pub fn partition_with(
    points: &PointSet,
    k: usize,
    config: &KMeansConfig,
) -> CoreResult<Partition> {
    if points.is_empty() {
        return Err(HotspotError::InsufficientData(
            "cannot partition an empty point set".to_string(),
        ));
    }

    let n = points.len();
    if k == 0 || k > n {
        return Err(HotspotError::InvalidParameter(format!(
            "k must be in [1, {}], got {}",
            n, k
        )));
    }

    if let Some(index) = points
        .iter()
        .position(|p| !(p.lat.is_finite() && p.lon.is_finite()))
    {
        return Err(HotspotError::InvariantViolation(format!(
            "point {} has a non-finite coordinate",
            index
        )));
    }

    if config.max_iterations == 0 {
        return Err(HotspotError::InvalidParameter(
            "max_iterations must be at least 1".to_string(),
        ));
    }

    if config.tolerance.is_nan() || config.tolerance < 0.0 {
        return Err(HotspotError::InvalidParameter(format!(
            "tolerance must be a non-negative number, got {}",
            config.tolerance
        )));
    }

    log::debug!("Partitioning {} points into {} clusters", n, k);

    let data = points.as_slice();
    let mut centers = init_centers(data, k);
    let mut labels: Vec<usize> = Vec::new();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        iterations += 1;

        let mut next = assign_labels(data, &centers);
        repair_empty_clusters(data, &mut next, &mut centers, k);

        let changed = next != labels;
        let updated = update_centers(data, &next, &centers);
        let shift = centers
            .iter()
            .zip(&updated)
            .map(|(old, new)| old.distance(new))
            .fold(0.0, f64::max);

        centers = updated;
        labels = next;

        log::debug!(
            "Iteration {}: max center shift {:.3e}, assignment changed: {}",
            iterations,
            shift,
            changed
        );

        if !changed || shift < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "Partitioning stopped at the {}-iteration cap without converging",
            config.max_iterations
        );
    }

    let inertia = data
        .iter()
        .zip(&labels)
        .map(|(p, &l)| p.distance_sq(&centers[l]))
        .sum();

    let centers = centers
        .into_iter()
        .enumerate()
        .map(|(label, position)| Center { label, position })
        .collect();

    Ok(Partition {
        assignment: ClusterAssignment::new(labels, k),
        centers,
        iterations,
        converged,
        inertia,
    })
}

/// Index and squared distance of the nearest center.
///
/// Ties go to the lowest index.
pub fn nearest_center(point: &Point, centers: &[Point]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = point.distance_sq(&centers[0]);

    for (c, center) in centers.iter().enumerate().skip(1) {
        let dist = point.distance_sq(center);
        if dist < best_dist {
            best = c;
            best_dist = dist;
        }
    }

    (best, best_dist)
}

/// k-means++ seeding from the fixed seed
fn init_centers(data: &[Point], k: usize) -> Vec<Point> {
    let n = data.len();
    let mut rng = ChaCha8Rng::seed_from_u64(DEFAULT_SEED);

    let first = rng.gen_range(0..n);
    let mut chosen = vec![false; n];
    chosen[first] = true;

    let mut centers = Vec::with_capacity(k);
    centers.push(data[first]);

    // Squared distance from each point to its closest chosen center
    let mut min_dist: Vec<f64> = data.iter().map(|p| p.distance_sq(&data[first])).collect();

    while centers.len() < k {
        let total: f64 = min_dist.iter().sum();

        let picked = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            weighted_pick(&min_dist, target)
        } else {
            // Every remaining point sits on a chosen center
            None
        };
        let next = picked
            .or_else(|| (0..n).find(|&i| !chosen[i]))
            .unwrap_or(0);

        chosen[next] = true;
        centers.push(data[next]);

        let center = data[next];
        for (d, p) in min_dist.iter_mut().zip(data) {
            *d = d.min(p.distance_sq(&center));
        }
    }

    centers
}

/// First index whose cumulative weight exceeds `target`, skipping zero weights
fn weighted_pick(weights: &[f64], target: f64) -> Option<usize> {
    let mut acc = 0.0;
    let mut pick = None;

    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        acc += w;
        pick = Some(i);
        if acc > target {
            break;
        }
    }

    pick
}

fn assign_labels(data: &[Point], centers: &[Point]) -> Vec<usize> {
    data.iter().map(|p| nearest_center(p, centers).0).collect()
}

/// Give every empty cluster one point.
///
/// The donor is the point farthest from its own center among clusters that
/// hold more than one point, lowest index on ties. One always exists since
/// `k <= n`.
fn repair_empty_clusters(data: &[Point], labels: &mut [usize], centers: &mut [Point], k: usize) {
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }

    for c in 0..k {
        if counts[c] > 0 {
            continue;
        }

        let mut donor: Option<(usize, f64)> = None;
        for (i, p) in data.iter().enumerate() {
            let l = labels[i];
            if counts[l] <= 1 {
                continue;
            }
            let dist = p.distance_sq(&centers[l]);
            if donor.map_or(true, |(_, best)| dist > best) {
                donor = Some((i, dist));
            }
        }

        if let Some((i, _)) = donor {
            log::debug!("Cluster {} is empty, reseeding at point {}", c, i);
            counts[labels[i]] -= 1;
            labels[i] = c;
            counts[c] = 1;
            centers[c] = data[i];
        }
    }
}

/// Mean of each cluster's points; a cluster without points keeps its center
fn update_centers(data: &[Point], labels: &[usize], previous: &[Point]) -> Vec<Point> {
    let k = previous.len();
    let mut sums = vec![(0.0f64, 0.0f64); k];
    let mut counts = vec![0usize; k];

    for (p, &l) in data.iter().zip(labels) {
        sums[l].0 += p.lat;
        sums[l].1 += p.lon;
        counts[l] += 1;
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|(((lat, lon), count), prev)| {
            if count == 0 {
                *prev
            } else {
                Point::new(lat / count as f64, lon / count as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> PointSet {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.1, 0.0),
            Point::new(0.0, 0.1),
            Point::new(10.0, 10.0),
            Point::new(10.1, 10.0),
            Point::new(10.0, 10.1),
        ]
        .into()
    }

    #[test]
    fn rejects_empty_input() {
        let err = partition(&PointSet::default(), 3).unwrap_err();
        assert!(matches!(err, HotspotError::InsufficientData(_)));
    }

    #[test]
    fn rejects_k_out_of_range() {
        let points = two_blobs();
        assert!(matches!(
            partition(&points, 0).unwrap_err(),
            HotspotError::InvalidParameter(_)
        ));
        assert!(matches!(
            partition(&points, 7).unwrap_err(),
            HotspotError::InvalidParameter(_)
        ));
    }

    #[test]
    fn rejects_non_finite_points() {
        let points: PointSet = vec![
            Point::new(41.88, -87.62),
            Point::new(f64::NAN, -87.60),
            Point::new(41.90, -87.60),
        ]
        .into();
        assert!(matches!(
            partition(&points, 2).unwrap_err(),
            HotspotError::InvariantViolation(_)
        ));

        let points: PointSet = vec![Point::new(41.88, f64::INFINITY); 2].into();
        assert!(matches!(
            partition(&points, 1).unwrap_err(),
            HotspotError::InvariantViolation(_)
        ));
    }

    #[test]
    fn rejects_bad_iteration_controls() {
        let points = two_blobs();
        let zero_cap = KMeansConfig {
            max_iterations: 0,
            ..KMeansConfig::default()
        };
        assert!(partition_with(&points, 2, &zero_cap).is_err());

        let nan_tol = KMeansConfig {
            tolerance: f64::NAN,
            ..KMeansConfig::default()
        };
        assert!(partition_with(&points, 2, &nan_tol).is_err());
    }

    #[test]
    fn separates_distant_groups() {
        let result = partition(&two_blobs(), 2).unwrap();
        let labels = result.assignment.labels();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[3], labels[5]);
        assert_ne!(labels[0], labels[3]);
        assert!(result.converged);

        let low = &result.centers[labels[0]].position;
        assert!((low.lat - 0.1 / 3.0).abs() < 1e-12);
        assert!((low.lon - 0.1 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn single_cluster_center_is_mean() {
        let points = two_blobs();
        let result = partition(&points, 1).unwrap();

        assert!(result.assignment.labels().iter().all(|&l| l == 0));
        let mean = points.center().unwrap();
        assert!(result.centers[0].position.distance(&mean) < 1e-12);
    }

    #[test]
    fn duplicates_still_fill_every_cluster() {
        let points: PointSet = vec![Point::new(1.0, 1.0); 4].into();
        let result = partition(&points, 4).unwrap();

        let mut labels = result.assignment.labels().to_vec();
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1, 2, 3]);
        assert!(result
            .centers
            .iter()
            .all(|c| c.position == Point::new(1.0, 1.0)));
        assert_eq!(result.inertia, 0.0);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let config = KMeansConfig {
            max_iterations: 1,
            tolerance: 0.0,
        };
        let result = partition_with(&two_blobs(), 2, &config).unwrap();

        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
        assert_eq!(result.assignment.len(), 6);
    }

    #[test]
    fn nearest_center_prefers_lowest_index_on_ties() {
        let centers = [Point::new(-1.0, 0.0), Point::new(1.0, 0.0)];
        assert_eq!(nearest_center(&Point::new(0.0, 0.0), &centers).0, 0);
        assert_eq!(nearest_center(&Point::new(0.5, 0.0), &centers).0, 1);
    }

    #[test]
    fn weighted_pick_skips_zero_weights() {
        let weights = [0.0, 1.0, 0.0, 3.0];
        assert_eq!(weighted_pick(&weights, 0.5), Some(1));
        assert_eq!(weighted_pick(&weights, 1.5), Some(3));
        assert_eq!(weighted_pick(&weights, 10.0), Some(3));
        assert_eq!(weighted_pick(&[0.0, 0.0], 0.0), None);
    }
}
