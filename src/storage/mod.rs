//! Results persistence module

use crate::analysis::HotspotAnalysis;
use anyhow::Result;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Save analysis results to the specified directory
pub fn save_results(analysis: &HotspotAnalysis, output_dir: &str) -> Result<()> {
    log::info!(
        "Saving {} hotspots to {}",
        analysis.summaries.len(),
        output_dir
    );

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(analysis, output_dir)?;
    save_hotspots(analysis, output_dir)?;
    save_assignments(analysis, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save run-level figures
fn save_summary(analysis: &HotspotAnalysis, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let insights = &analysis.insights;
    let bounds = analysis.points.bounds();

    let summary = json!({
        "insights": {
            "total_points": insights.total_points,
            "active_hotspots": insights.active_hotspots,
            "most_dense_hotspot": insights.most_dense_count,
            "tier_breakdown": insights.tier_breakdown.iter().map(|(tier, n)| {
                json!({ "tier": tier.as_str(), "hotspots": n })
            }).collect::<Vec<_>>(),
        },
        "map": {
            "center": analysis.map_center,
            "bounds": bounds.map(|(sw, ne)| json!({ "south_west": sw, "north_east": ne })),
        },
        "run": {
            "k": analysis.partition.centers.len(),
            "iterations": analysis.partition.iterations,
            "converged": analysis.partition.converged,
            "inertia": analysis.partition.inertia,
        },
        "elbow": analysis.elbow,
        "heatmap_cells": analysis.heatmap.as_ref().map(Vec::len),
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save one entry per hotspot
fn save_hotspots(analysis: &HotspotAnalysis, output_dir: &str) -> Result<()> {
    log::info!("Saving hotspot information");

    let path = Path::new(output_dir).join("hotspots.json");
    let mut file = File::create(path)?;

    let hotspots: Vec<_> = analysis
        .summaries
        .iter()
        .map(|s| {
            let center = &analysis.partition.centers[s.label];
            json!({
                "hotspot": s.region(),
                "cluster": s.label,
                "center": center.position,
                "crime_count": s.count,
                "risk_level": s.tier.as_str(),
                "mean_radius": analysis.radii[s.label],
            })
        })
        .collect();

    file.write_all(to_string_pretty(&json!({ "hotspots": hotspots }))?.as_bytes())?;

    Ok(())
}

/// Save the label of every point
fn save_assignments(analysis: &HotspotAnalysis, output_dir: &str) -> Result<()> {
    log::info!("Saving {} point assignments", analysis.points.len());

    let path = Path::new(output_dir).join("assignments.csv");
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "latitude,longitude,cluster")?;
    for (p, label) in analysis
        .points
        .iter()
        .zip(analysis.partition.assignment.labels())
    {
        writeln!(file, "{},{},{}", p.lat, p.lon, label)?;
    }

    file.flush()?;

    Ok(())
}
