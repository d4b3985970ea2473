//! Point representation for incident locations

pub mod density;
pub mod point;
pub mod point_set;

pub use density::{density_grid, DensityCell};
pub use point::Point;
pub use point_set::{PointSet, PointSetBuilder};
