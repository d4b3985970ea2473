//! Core library functions for the crime hotspot analyzer

pub mod analysis;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod spatial;
pub mod storage;
pub mod viz;

pub use anyhow::{anyhow, Result};
pub use cluster::kmeans::partition;
pub use cluster::summary::{summarize, ClusterSummary, RiskTier};
pub use cluster::{Center, ClusterAssignment, Partition};
pub use error::HotspotError;
pub use spatial::{Point, PointSet};
