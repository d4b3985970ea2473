//! CSV and Parquet handling for incident coordinates

use crate::config::Config;
use crate::spatial::{PointSet, PointSetBuilder};
use anyhow::Result;
use log;
use polars::prelude::*;
use std::path::Path;

/// Column layout and filtering for one load
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Column holding latitude
    pub lat_column: String,

    /// Column holding longitude
    pub lon_column: String,

    /// Column holding the crime category
    pub type_column: String,

    /// Keep only incidents of this crime type
    pub crime_type: Option<String>,
}

impl LoadOptions {
    /// Options using the configured column names
    pub fn from_config(config: &Config, crime_type: Option<String>) -> Self {
        Self {
            lat_column: config.lat_column.clone(),
            lon_column: config.lon_column.clone(),
            type_column: config.type_column.clone(),
            crime_type,
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), None)
    }
}

/// Load incident coordinates into a PointSet.
///
/// `.parquet` files are scanned as Parquet, anything else is read as CSV
/// with a header row. Rows with a missing or non-numeric coordinate are
/// dropped and counted.
pub fn load_incidents(path: &str, options: &LoadOptions) -> Result<PointSet> {
    log::info!("Reading incident file: {}", path);

    // Check if the file exists
    if !Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let mut frame = scan(path)?;

    if let Some(ref crime_type) = options.crime_type {
        log::info!("Filtering to crime type: {}", crime_type);
        frame = frame.filter(col(options.type_column.as_str()).eq(lit(crime_type.clone())));
    }

    let df = frame
        .select([
            col(options.lat_column.as_str()).cast(DataType::Float64),
            col(options.lon_column.as_str()).cast(DataType::Float64),
        ])
        .collect()?;

    log::info!("Loaded {} incident rows", df.height());

    let lat = df.column(options.lat_column.as_str())?.f64()?;
    let lon = df.column(options.lon_column.as_str())?.f64()?;

    let mut builder = PointSetBuilder::with_capacity(df.height());
    for (la, lo) in lat.into_iter().zip(lon.into_iter()) {
        builder.push(la, lo);
    }

    if builder.dropped() > 0 {
        log::warn!(
            "Dropped {} rows with missing or invalid coordinates",
            builder.dropped()
        );
    }

    let points = builder.build();
    log::info!("Kept {} incident points", points.len());

    Ok(points)
}

fn scan(path: &str) -> Result<LazyFrame> {
    let is_parquet = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("parquet"));

    let frame = if is_parquet {
        LazyFrame::scan_parquet(path, Default::default())?
    } else {
        LazyCsvReader::new(path).with_has_header(true).finish()?
    };

    Ok(frame)
}
