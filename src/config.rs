//! Configuration management for the hotspot analyzer

use std::ops::RangeInclusive;

/// Seed for center initialization. Fixed so identical inputs always yield
/// identical clusters.
pub const DEFAULT_SEED: u64 = 42;

/// Default configuration for the hotspot analyzer
pub struct Config {
    /// Number of hotspot regions
    pub k: usize,

    /// Iteration cap for one partitioning run
    pub max_iterations: usize,

    /// Center movement below which a run is considered converged
    pub tolerance: f64,

    /// Column holding incident latitude
    pub lat_column: String,

    /// Column holding incident longitude
    pub lon_column: String,

    /// Column holding the crime category used by the type filter
    pub type_column: String,

    /// Values of k swept by the elbow diagnostic
    pub elbow_range: RangeInclusive<usize>,

    /// Grid cells per side of the density heatmap
    pub heatmap_cells: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            k: 5,
            max_iterations: 300,
            tolerance: 1e-4,
            lat_column: "LATITUDE".to_string(),
            lon_column: "LONGITUDE".to_string(),
            type_column: "PRIMARY_TYPE".to_string(),
            elbow_range: 2..=10,
            heatmap_cells: 50,
        }
    }
}
