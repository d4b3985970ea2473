//! Hotspot cluster analysis module

pub mod kmeans;
pub mod metrics;
pub mod summary;

use crate::error::{CoreResult, HotspotError};
use crate::spatial::Point;
use serde::{Deserialize, Serialize};

/// Fill colors for cluster markers, indexed by `label % 10`
pub const CLUSTER_COLORS: [&str; 10] = [
    "red",
    "green",
    "purple",
    "orange",
    "darkred",
    "cadetblue",
    "darkgreen",
    "darkpurple",
    "pink",
    "black",
];

/// Marker color for a cluster label
pub fn cluster_color(label: usize) -> &'static str {
    CLUSTER_COLORS[label % CLUSTER_COLORS.len()]
}

/// Cluster label per point index, with labels in `[0, k)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    /// Label of each point, in point order
    labels: Vec<usize>,

    /// Number of clusters the labels refer to
    k: usize,
}

impl ClusterAssignment {
    /// Wrap raw labels. Nothing is checked here; [`ClusterAssignment::validate`]
    /// reports labels outside `[0, k)`.
    pub fn new(labels: Vec<usize>, k: usize) -> Self {
        Self { labels, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of labelled points
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Indices of the points carrying `label`
    pub fn members(&self, label: usize) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |&(_, &l)| l == label)
            .map(|(i, _)| i)
    }

    /// Check that every label is within `[0, k)`
    pub fn validate(&self) -> CoreResult<()> {
        if let Some((index, &label)) = self
            .labels
            .iter()
            .enumerate()
            .find(|&(_, &l)| l >= self.k)
        {
            return Err(HotspotError::InvariantViolation(format!(
                "point {} has label {} outside [0, {})",
                index, label, self.k
            )));
        }
        Ok(())
    }
}

/// Representative location of one cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    /// Cluster label this center belongs to
    pub label: usize,

    /// Mean position of the cluster's points
    pub position: Point,
}

/// Result of one partitioning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Label of every input point
    pub assignment: ClusterAssignment,

    /// Exactly k centers, in label order
    pub centers: Vec<Center>,

    /// Number of assign/update iterations performed
    pub iterations: usize,

    /// Whether the run stopped before hitting the iteration cap
    pub converged: bool,

    /// Sum of squared distances from each point to its center
    pub inertia: f64,
}
