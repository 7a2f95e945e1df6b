use std::{net::SocketAddr, num::NonZeroUsize, process, sync::Arc};

use clap::{Parser, Subcommand};
use config::{Config, ProjectionConfig};
use log::{error, info};
use projector::{compute_summary, DisplayMode};
use rand::{rngs::StdRng, SeedableRng};
use tokio::task;

mod config;
mod error;
mod network;
mod observer;
mod render;
mod session;
mod source;

use error::Error;
use network::http;
use observer::LogObserver;
use session::Session;

/// The command of nodemap
#[derive(Debug, Parser)]
struct Opts {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Load the node snapshot and serve it to the map front end
    Serve {
        /// the config file path, default is `config.toml`
        #[arg(short, long, default_value_t = String::from("config.toml"))]
        config: String,
    },
    /// Print the display points of a snapshot as JSON
    Project {
        /// the snapshot file path or URL
        #[arg(short, long)]
        data: String,
        /// `observed` (or `live`), `0.01%`, `0.1%` or `1%`
        #[arg(short, long, default_value_t = DisplayMode::Observed)]
        mode: DisplayMode,
        /// cap on the number of points, defaults to the cap of the mode
        #[arg(long)]
        max_points: Option<NonZeroUsize>,
        /// seed for the simulation sampler
        #[arg(long)]
        seed: Option<u64>,
        /// print a GeoJSON FeatureCollection instead of plain points
        #[arg(long)]
        geojson: bool,
    },
    /// Print the summary stats of a snapshot as JSON
    Summary {
        /// the snapshot file path or URL
        #[arg(short, long)]
        data: String,
    },
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let res = match opts.subcmd {
        SubCommand::Serve { config } => serve(&config).await,
        SubCommand::Project {
            data,
            mode,
            max_points,
            seed,
            geojson,
        } => project(&data, mode, max_points, seed, geojson).await,
        SubCommand::Summary { data } => summary(&data).await,
    };

    if let Err(err) = res {
        error!("❌ {} error: {}", err.kind(), err);
        process::exit(1);
    }
}

async fn serve(config_file: &str) -> Result<(), Error> {
    // Load config.
    let Config {
        data_source,
        http_addr,
        projection,
    } = Config::load(config_file)?;
    let http_addr: SocketAddr = http_addr.parse()?;
    info!("📣 Projection: {:?}", projection);

    let session = Arc::new(Session::new(projection, LogObserver)?);

    // The map can be served while the snapshot is still loading.
    let loader = session.clone();
    task::spawn(async move {
        let source = source::from_location(&data_source);
        // Failures are recorded in the session and reported to the front end.
        let _ = loader.load(source.as_ref()).await;
    });

    http::run(http_addr, session).await;
    Ok(())
}

async fn project(
    location: &str,
    mode: DisplayMode,
    max_points: Option<NonZeroUsize>,
    seed: Option<u64>,
    geojson: bool,
) -> Result<(), Error> {
    let projection = ProjectionConfig::default();
    let dataset = source::from_location(location).load().await?;
    let max_points = max_points.unwrap_or_else(|| projection.max_points(mode));
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let points = projection
        .projector()?
        .compute_display_points(&dataset, mode, max_points, &mut rng)?;
    info!("📣 Projected {} points in mode {}", points.len(), mode);

    let output = if geojson {
        render::feature_collection(&points)
    } else {
        serde_json::json!(points)
    };
    println!("{output:#}");
    Ok(())
}

async fn summary(location: &str) -> Result<(), Error> {
    let dataset = source::from_location(location).load().await?;
    let stats = compute_summary(&dataset);

    println!("{:#}", serde_json::json!(stats));
    Ok(())
}
