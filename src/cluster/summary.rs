//! Hotspot summaries and risk classification

use crate::cluster::ClusterAssignment;
use crate::error::{CoreResult, HotspotError};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts above this are High risk
pub const HIGH_RISK_THRESHOLD: usize = 500;

/// Counts above this (and not High) are Moderate risk
pub const MODERATE_RISK_THRESHOLD: usize = 200;

/// Coarse severity of a hotspot, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// Classify an incident count
    pub fn from_count(count: usize) -> Self {
        if count > HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if count > MODERATE_RISK_THRESHOLD {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident volume and risk for one cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Cluster label in `[0, k)`
    pub label: usize,

    /// Number of points assigned to the cluster
    pub count: usize,

    /// Risk tier derived from `count`
    pub tier: RiskTier,
}

impl ClusterSummary {
    /// One-based region number shown to users
    pub fn region(&self) -> usize {
        self.label + 1
    }
}

/// Count points per cluster and classify each cluster's risk.
///
/// Entries come back in label order. Labels without points are omitted.
/// A label outside `[0, k)` is an `InvariantViolation`.
pub fn summarize(assignment: &ClusterAssignment) -> CoreResult<Vec<ClusterSummary>> {
    assignment.validate()?;

    let mut counts = vec![0usize; assignment.k()];
    for &label in assignment.labels() {
        counts[label] += 1;
    }

    let summaries = counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(label, count)| ClusterSummary {
            label,
            count,
            tier: RiskTier::from_count(count),
        })
        .collect();

    Ok(summaries)
}

/// Headline figures for a dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotInsights {
    /// Incident points that took part in clustering
    pub total_points: usize,

    /// Number of hotspot regions requested
    pub active_hotspots: usize,

    /// Largest single-cluster count
    pub most_dense_count: usize,

    /// Hotspots per risk tier, as (tier, number of hotspots)
    pub tier_breakdown: Vec<(RiskTier, usize)>,
}

impl HotspotInsights {
    /// Derive dashboard figures from a summary.
    ///
    /// The summary must account for exactly `total_points` points.
    pub fn from_summaries(
        total_points: usize,
        active_hotspots: usize,
        summaries: &[ClusterSummary],
    ) -> CoreResult<Self> {
        let counted: usize = summaries.iter().map(|s| s.count).sum();
        if counted != total_points {
            return Err(HotspotError::InvariantViolation(format!(
                "summaries cover {} points but {} were clustered",
                counted, total_points
            )));
        }

        let most_dense_count = summaries.iter().map(|s| s.count).max().unwrap_or(0);

        let tier_breakdown = summaries
            .iter()
            .map(|s| s.tier)
            .sorted()
            .rev()
            .dedup_with_count()
            .map(|(n, tier)| (tier, n))
            .collect();

        Ok(Self {
            total_points,
            active_hotspots,
            most_dense_count,
            tier_breakdown,
        })
    }
}
