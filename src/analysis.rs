//! One hotspot analysis request, from points to summaries

use crate::cluster::kmeans::{partition_with, KMeansConfig};
use crate::cluster::metrics::{elbow_curve, mean_radius, ElbowPoint};
use crate::cluster::summary::{summarize, ClusterSummary, HotspotInsights};
use crate::cluster::Partition;
use crate::config::Config;
use crate::error::CoreResult;
use crate::spatial::{density_grid, DensityCell, Point, PointSet};

/// Optional extras computed alongside the partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Sweep k over the configured range for the elbow diagnostic
    pub elbow: bool,

    /// Bin incidents into a density heatmap layer
    pub heatmap: bool,
}

/// Everything produced by one request. Owned by the caller; nothing here is
/// cached or shared between requests.
#[derive(Debug, Clone)]
pub struct HotspotAnalysis {
    pub points: PointSet,
    pub partition: Partition,
    pub summaries: Vec<ClusterSummary>,
    pub insights: HotspotInsights,

    /// Mean distance from each hotspot's incidents to its center, in label order
    pub radii: Vec<f64>,

    /// Mean of all points, used as the initial map view
    pub map_center: Point,

    /// Present only when an elbow sweep was requested
    pub elbow: Option<Vec<ElbowPoint>>,

    /// Present only when a heatmap was requested
    pub heatmap: Option<Vec<DensityCell>>,
}

/// Partition, summarize and compute the requested extras
pub fn analyze(
    points: PointSet,
    config: &Config,
    options: AnalysisOptions,
) -> CoreResult<HotspotAnalysis> {
    let kmeans = KMeansConfig::from(config);

    let partition = partition_with(&points, config.k, &kmeans)?;
    log::info!(
        "Partitioned {} points into {} hotspots in {} iterations",
        points.len(),
        config.k,
        partition.iterations
    );

    let summaries = summarize(&partition.assignment)?;
    let insights = HotspotInsights::from_summaries(points.len(), config.k, &summaries)?;
    let radii = mean_radius(&points, &partition)?;

    let elbow = if options.elbow {
        Some(elbow_curve(&points, config.elbow_range.clone(), &kmeans)?)
    } else {
        None
    };

    let heatmap = if options.heatmap {
        let cells = density_grid(&points, config.heatmap_cells);
        log::info!("Binned incidents into {} heatmap cells", cells.len());
        Some(cells)
    } else {
        None
    };

    // partition_with rejects empty input, so the mean exists
    let map_center = points.center().unwrap_or(partition.centers[0].position);

    Ok(HotspotAnalysis {
        points,
        partition,
        summaries,
        insights,
        radii,
        map_center,
        elbow,
        heatmap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::summary::RiskTier;
    use crate::error::HotspotError;

    fn downtown() -> PointSet {
        vec![
            Point::new(41.88, -87.62),
            Point::new(41.88, -87.62),
            Point::new(41.90, -87.60),
        ]
        .into()
    }

    #[test]
    fn analyze_reports_kpis() {
        let config = Config {
            k: 2,
            elbow_range: 1..=3,
            ..Config::default()
        };
        let options = AnalysisOptions {
            elbow: true,
            heatmap: false,
        };

        let analysis = analyze(downtown(), &config, options).unwrap();

        assert_eq!(analysis.insights.total_points, 3);
        assert_eq!(analysis.insights.active_hotspots, 2);
        assert_eq!(analysis.insights.most_dense_count, 2);
        assert!(analysis.summaries.iter().all(|s| s.tier == RiskTier::Low));
        assert_eq!(analysis.elbow.as_ref().map(Vec::len), Some(3));
        assert!(analysis.heatmap.is_none());
        assert!((analysis.map_center.lat - (41.88 * 2.0 + 41.90) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn radii_follow_label_order() {
        let config = Config {
            k: 2,
            ..Config::default()
        };
        let analysis = analyze(downtown(), &config, AnalysisOptions::default()).unwrap();

        assert_eq!(analysis.radii, vec![0.0, 0.0]);
        assert!(analysis.elbow.is_none());
    }

    #[test]
    fn heatmap_accounts_for_every_point() {
        let config = Config {
            k: 2,
            heatmap_cells: 4,
            ..Config::default()
        };
        let options = AnalysisOptions {
            elbow: false,
            heatmap: true,
        };
        let analysis = analyze(downtown(), &config, options).unwrap();

        let cells = analysis.heatmap.unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells.iter().map(|c| c.count).sum::<usize>(), 3);
    }

    #[test]
    fn analyze_propagates_core_errors() {
        let err = analyze(PointSet::default(), &Config::default(), AnalysisOptions::default())
            .unwrap_err();
        assert!(matches!(err, HotspotError::InsufficientData(_)));
    }
}
