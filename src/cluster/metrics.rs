//! Cluster quality metrics

use crate::cluster::kmeans::{partition_with, KMeansConfig};
use crate::cluster::Partition;
use crate::error::{CoreResult, HotspotError};
use crate::spatial::PointSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Inertia of one k in an elbow sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElbowPoint {
    pub k: usize,
    pub inertia: f64,
}

/// Check that `partition` labels exactly the points in `points`
fn check_matches(points: &PointSet, partition: &Partition) -> CoreResult<()> {
    if points.len() != partition.assignment.len() {
        return Err(HotspotError::InvariantViolation(format!(
            "partition labels {} points but the point set holds {}",
            partition.assignment.len(),
            points.len()
        )));
    }

    let k = partition.centers.len();
    if let Some(&label) = partition.assignment.labels().iter().find(|&&l| l >= k) {
        return Err(HotspotError::InvariantViolation(format!(
            "label {} has no center among {}",
            label, k
        )));
    }

    Ok(())
}

/// Recompute inertia (sum of squared distances to the assigned center)
pub fn inertia(points: &PointSet, partition: &Partition) -> CoreResult<f64> {
    check_matches(points, partition)?;

    Ok(points
        .iter()
        .zip(partition.assignment.labels())
        .map(|(p, &label)| p.distance_sq(&partition.centers[label].position))
        .sum())
}

/// Mean distance from each cluster's points to its center, in label order
pub fn mean_radius(points: &PointSet, partition: &Partition) -> CoreResult<Vec<f64>> {
    check_matches(points, partition)?;

    let k = partition.centers.len();
    let mut totals = vec![0.0f64; k];
    let mut counts = vec![0usize; k];

    for (p, &label) in points.iter().zip(partition.assignment.labels()) {
        totals[label] += p.distance(&partition.centers[label].position);
        counts[label] += 1;
    }

    Ok(totals
        .into_iter()
        .zip(counts)
        .map(|(total, count)| if count == 0 { 0.0 } else { total / count as f64 })
        .collect())
}

/// Inertia for each k, for an elbow chart.
///
/// Each k is an independent partitioning run, executed in parallel. Values of
/// k larger than the point set are skipped. Output is sorted by k. This is a
/// diagnostic only; it never picks k.
pub fn elbow_curve<I>(points: &PointSet, ks: I, config: &KMeansConfig) -> CoreResult<Vec<ElbowPoint>>
where
    I: IntoIterator<Item = usize>,
{
    let mut ks: Vec<usize> = ks
        .into_iter()
        .filter(|&k| k >= 1 && k <= points.len())
        .collect();
    ks.sort_unstable();
    ks.dedup();

    log::info!("Computing elbow curve over {} values of k", ks.len());

    ks.into_par_iter()
        .map(|k| {
            let result = partition_with(points, k, config)?;
            Ok(ElbowPoint {
                k,
                inertia: result.inertia,
            })
        })
        .collect()
}
