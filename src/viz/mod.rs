//! Visualization generation module

use crate::analysis::HotspotAnalysis;
use crate::cluster::cluster_color;
use crate::cluster::metrics::ElbowPoint;
use crate::spatial::DensityCell;
use anyhow::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Marker color of hotspot centers
pub const CENTER_COLOR: &str = "#2563eb";

/// Generate visualizations from analysis results
pub fn generate_visualizations(analysis: &HotspotAnalysis, output_dir: &str) -> Result<()> {
    log::info!(
        "Generating visualizations for {} hotspots",
        analysis.summaries.len()
    );

    // Create visualizations directory
    let viz_dir = Path::new(output_dir).join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    generate_map_data(analysis, &viz_dir)?;
    generate_html_report(analysis, &viz_dir)?;
    generate_stats_files(analysis, &viz_dir)?;

    log::info!("Visualizations generated successfully");

    Ok(())
}

/// Point and center layers for external mapping tools
fn generate_map_data(analysis: &HotspotAnalysis, viz_dir: &Path) -> Result<()> {
    log::info!("Generating map layers");

    let mut points_file = BufWriter::new(File::create(viz_dir.join("points.csv"))?);
    writeln!(points_file, "latitude,longitude,cluster,color")?;

    for (p, &label) in analysis
        .points
        .iter()
        .zip(analysis.partition.assignment.labels())
    {
        writeln!(
            points_file,
            "{},{},{},{}",
            p.lat,
            p.lon,
            label,
            cluster_color(label)
        )?;
    }
    points_file.flush()?;

    let mut centers_file = File::create(viz_dir.join("centers.csv"))?;
    writeln!(centers_file, "hotspot,latitude,longitude,color")?;
    for center in &analysis.partition.centers {
        writeln!(
            centers_file,
            "{},{},{},{}",
            center.label + 1,
            center.position.lat,
            center.position.lon,
            CENTER_COLOR
        )?;
    }

    if let Some(ref cells) = analysis.heatmap {
        write_heatmap(cells, &viz_dir.join("heatmap.csv"))?;
    }

    Ok(())
}

/// Density layer: one row per non-empty grid cell
fn write_heatmap(cells: &[DensityCell], path: &Path) -> Result<()> {
    log::info!("Writing heatmap layer with {} cells", cells.len());

    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "row,col,latitude,longitude,count,weight")?;
    for c in cells {
        writeln!(
            file,
            "{},{},{},{},{},{:.6}",
            c.row, c.col, c.center.lat, c.center.lon, c.count, c.weight
        )?;
    }
    file.flush()?;

    Ok(())
}

/// Static HTML report with legend, KPI cards and the hotspot table
fn generate_html_report(analysis: &HotspotAnalysis, viz_dir: &Path) -> Result<()> {
    log::info!("Generating HTML report");

    let mut f = BufWriter::new(File::create(viz_dir.join("index.html"))?);
    let insights = &analysis.insights;

    writeln!(f, "<!DOCTYPE html>")?;
    writeln!(f, "<html lang=\"en\">")?;
    writeln!(f, "<head>")?;
    writeln!(f, "  <meta charset=\"UTF-8\">")?;
    writeln!(f, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(f, "  <title>Crime Hotspot Analysis</title>")?;
    writeln!(f, "  <style>")?;
    writeln!(f, "    body {{ font-family: Arial, sans-serif; margin: 20px; background-color: #f5f7fa; }}")?;
    writeln!(f, "    h1, h2 {{ color: #111827; }}")?;
    writeln!(f, "    .kpis {{ display: flex; gap: 20px; }}")?;
    writeln!(f, "    .kpi-card {{ background: #fff; padding: 20px; border-radius: 12px; border-left: 6px solid {}; }}", CENTER_COLOR)?;
    writeln!(f, "    .legend {{ background: #fff; padding: 15px; border-radius: 10px; border: 1px solid #e5e7eb; width: 260px; }}")?;
    writeln!(f, "    table {{ border-collapse: collapse; background: #fff; }}")?;
    writeln!(f, "    th, td {{ border: 1px solid #e5e7eb; padding: 6px 12px; text-align: left; }}")?;
    writeln!(f, "  </style>")?;
    writeln!(f, "</head>")?;
    writeln!(f, "<body>")?;
    writeln!(f, "  <h1>Crime Hotspot Analysis</h1>")?;
    writeln!(
        f,
        "  <p>Map center: {:.5}, {:.5}</p>",
        analysis.map_center.lat, analysis.map_center.lon
    )?;

    // KPI cards
    writeln!(f, "  <h2>Crime Hotspot Summary</h2>")?;
    writeln!(f, "  <div class=\"kpis\">")?;
    for (title, value) in [
        ("Total Crime Records", insights.total_points),
        ("Identified Hotspot Regions", insights.active_hotspots),
        ("Highest Cluster Density", insights.most_dense_count),
    ] {
        writeln!(f, "    <div class=\"kpi-card\"><b>{}</b><br>{}</div>", title, value)?;
    }
    writeln!(f, "  </div>")?;

    // Legend
    writeln!(f, "  <h2>Map Legend</h2>")?;
    writeln!(f, "  <div class=\"legend\">")?;
    writeln!(f, "    <b>Cluster Distribution</b><br>")?;
    for center in &analysis.partition.centers {
        writeln!(
            f,
            "    <span style=\"color:{};\">&#9679;</span> Cluster {}<br>",
            cluster_color(center.label),
            center.label + 1
        )?;
    }
    writeln!(f, "    <br><b>Hotspot Center</b><br>")?;
    writeln!(
        f,
        "    <span style=\"color:{};\">&#9679;</span> Cluster centroid",
        CENTER_COLOR
    )?;
    if let Some(ref cells) = analysis.heatmap {
        writeln!(
            f,
            "    <br><b>Crime Density</b><br>{} heatmap cells (heatmap.csv)",
            cells.len()
        )?;
    }
    writeln!(f, "  </div>")?;

    // Hotspot table
    writeln!(f, "  <h2>Hotspot Distribution Details</h2>")?;
    writeln!(f, "  <table>")?;
    writeln!(f, "    <tr><th>Hotspot Region</th><th>Center</th><th>Crime Count</th><th>Mean Radius</th><th>Risk Classification</th></tr>")?;
    for s in &analysis.summaries {
        let center = &analysis.partition.centers[s.label].position;
        writeln!(
            f,
            "    <tr><td>{}</td><td>{:.5}, {:.5}</td><td>{}</td><td>{:.5}</td><td>{}</td></tr>",
            s.region(),
            center.lat,
            center.lon,
            s.count,
            analysis.radii[s.label],
            s.tier
        )?;
    }
    writeln!(f, "  </table>")?;

    writeln!(f, "</body>")?;
    writeln!(f, "</html>")?;
    f.flush()?;

    Ok(())
}

/// CSV statistics for charting
fn generate_stats_files(analysis: &HotspotAnalysis, viz_dir: &Path) -> Result<()> {
    log::info!("Generating statistics files");

    let mut stats_file = File::create(viz_dir.join("hotspot_stats.csv"))?;
    writeln!(stats_file, "hotspot,crime_count,risk_level,mean_radius,color")?;
    for s in &analysis.summaries {
        writeln!(
            stats_file,
            "{},{},{},{:.8},{}",
            s.region(),
            s.count,
            s.tier,
            analysis.radii[s.label],
            cluster_color(s.label)
        )?;
    }

    if let Some(ref elbow) = analysis.elbow {
        write_elbow(elbow, &viz_dir.join("elbow.csv"))?;
    }

    Ok(())
}

fn write_elbow(elbow: &[ElbowPoint], path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "k,inertia")?;
    for e in elbow {
        writeln!(file, "{},{:.8}", e.k, e.inertia)?;
    }
    Ok(())
}
