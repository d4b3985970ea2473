use anyhow::Result;
use clap::Parser;

use hotspot::analysis::{self, AnalysisOptions};
use hotspot::config::Config;
use hotspot::data::{self, LoadOptions};
use hotspot::{storage, viz};

#[derive(Parser, Debug)]
#[clap(
    name = "crime-hotspot-analyzer",
    about = "Locate crime hotspots with k-means clustering and classify their risk"
)]
struct Cli {
    /// Path to input CSV or Parquet file
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "hotspot_results")]
    output_dir: String,

    /// Number of hotspot regions
    #[clap(long, short, default_value = "5", value_parser = clap::value_parser!(u8).range(2..=10))]
    k: u8,

    /// Only cluster incidents of this crime type
    #[clap(long)]
    crime_type: Option<String>,

    /// Compute the elbow diagnostic over k = 2..=10
    #[clap(long)]
    elbow: bool,

    /// Add a crime density heatmap layer
    #[clap(long)]
    heatmap: bool,

    /// Skip visualizations
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads for the elbow sweep (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting crime hotspot analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    std::fs::create_dir_all(&args.output_dir)?;

    let config = Config {
        k: args.k as usize,
        ..Config::default()
    };

    // 1. Load incident coordinates
    let options = LoadOptions::from_config(&config, args.crime_type.clone());
    let points = data::load_incidents(&args.input, &options)?;

    if points.len() < config.k {
        return Err(anyhow::anyhow!(
            "Only {} incident points available, cannot form {} hotspots",
            points.len(),
            config.k
        ));
    }

    // 2. Partition and summarize
    let options = AnalysisOptions {
        elbow: args.elbow,
        heatmap: args.heatmap,
    };
    let analysis = analysis::analyze(points, &config, options)?;

    for s in &analysis.summaries {
        log::info!(
            "Hotspot {}: {} incidents, {} risk",
            s.region(),
            s.count,
            s.tier
        );
    }

    // 3. Save results
    storage::save_results(&analysis, &args.output_dir)?;

    // 4. Generate visualizations if requested
    if !args.skip_viz {
        viz::generate_visualizations(&analysis, &args.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
