//! # evac-route
//!
//! Loads a road network and flood zones, then either prints a hazard-averse
//! route as GeoJSON or prints the network's hazard statistics.
//!
//! ```text
//! evac-route --config floodroute.toml route 50.060 19.940 50.061 19.941
//! evac-route --roads roads.geojson --hazards flood.geojson stats
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG=info` to see build progress.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use fr_core::CoordPrecision;
use fr_service::{BuildStatus, RouteQuery, RoutingState, ServiceConfig};

#[derive(Parser)]
#[command(name = "evac-route")]
#[command(about = "Hazard-averse routing over a GeoJSON road network")]
struct Cli {
    /// TOML configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Road network FeatureCollection
    #[arg(long)]
    roads: Option<PathBuf>,

    /// Flood zone FeatureCollection
    #[arg(long)]
    hazards: Option<PathBuf>,

    /// Cost multiplier for flooded edges
    #[arg(long)]
    penalty: Option<f64>,

    /// Merge vertices that agree to this many decimal places
    #[arg(long)]
    decimals: Option<u8>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the route between two points as a GeoJSON response
    Route {
        #[arg(allow_negative_numbers = true)]
        start_lat: f64,
        #[arg(allow_negative_numbers = true)]
        start_lon: f64,
        #[arg(allow_negative_numbers = true)]
        end_lat:   f64,
        #[arg(allow_negative_numbers = true)]
        end_lon:   f64,
    },
    /// Print node, edge and flooded-edge counts
    Stats,
}

fn main() {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let state = RoutingState::initialize(config).context("invalid configuration")?;
    if let BuildStatus::Fallback(kind) = state.status() {
        info!("network unavailable ({kind}); every route request will fail");
    }

    match cli.command {
        Command::Route { start_lat, start_lon, end_lat, end_lon } => {
            let query = RouteQuery::new(start_lat, start_lon, end_lat, end_lon);
            let response = state.route(&query).context("route request failed")?;
            print_json(&response, cli.pretty)
        }
        Command::Stats => {
            let snapshot = state.snapshot();
            let report = serde_json::json!({
                "status": snapshot.status,
                "num_nodes": snapshot.graph.node_count(),
                "num_edges": snapshot.hazard_stats.num_edges,
                "num_flooded_edges": snapshot.hazard_stats.num_flooded_edges,
                "num_polygons": snapshot.hazard_stats.num_polygons,
            });
            print_json(&report, cli.pretty)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(roads) = &cli.roads {
        config.roads_path = roads.clone();
    }
    if let Some(hazards) = &cli.hazards {
        config.hazards_path = hazards.clone();
    }
    if let Some(penalty) = cli.penalty {
        config.penalty_factor = penalty;
    }
    if let Some(n) = cli.decimals {
        config.coord_precision = CoordPrecision::Decimals(n);
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
