//! map-cli — load a map dataset and query it from the command line.
//!
//! ```text
//! map-cli --data data generate --size 20
//! map-cli --data data info
//! map-cli --data data nearest 120 340
//! map-cli --data data range primary 0 0 500 500
//! map-cli --data data route 0 0 900 900 --metric length
//! ```
//!
//! Set `RUST_LOG=debug` to see load progress and router cache activity.

mod synth;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use map_core::{Point, Rect, RoadType};
use map_model::{LoadSummary, MapConfig, MapModel, MapModelBuilder, MapObserver};
use map_routing::{Metric, Route};

#[derive(Parser, Debug)]
#[command(name = "map-cli", version, about = "Query and route over a binary map dataset")]
struct Cli {
    /// Dataset directory (info.bin, nodes.bin, edges<code>.bin).
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Coastline directory.
    #[arg(long)]
    coastline: Option<PathBuf>,

    /// Load worker threads.
    #[arg(long, default_value_t = MapConfig::DEFAULT_WORKER_THREADS)]
    workers: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a synthetic grid dataset to --data (and --coastline, if given).
    Generate {
        /// Nodes per side.
        #[arg(long, default_value_t = 10)]
        size: u32,
        /// Distance between neighbouring nodes in metres.
        #[arg(long, default_value_t = 100.0)]
        spacing: f32,
    },
    /// Print the dataset header and load summary.
    Info,
    /// Name the road nearest to a point.
    Nearest {
        x: f64,
        y: f64,
        /// Only consider road types drawn at this zoom factor.
        #[arg(long)]
        zoom: Option<f64>,
    },
    /// List edges of one road type inside a rectangle.
    Range {
        road_type: RoadType,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    /// Shortest route between the roads nearest to two points.
    Route {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        #[arg(long, default_value = "time")]
        metric: Metric,
    },
}

// ── Load progress ─────────────────────────────────────────────────────────────

struct Progress;

impl MapObserver for Progress {
    fn on_batch_loaded(&mut self, road_type: RoadType, edges: usize) {
        log::info!("loaded {edges} {road_type} edges");
    }

    fn on_load_complete(&mut self, summary: &LoadSummary) {
        if !summary.failed.is_empty() {
            log::warn!("road types left out: {:?}", summary.failed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Command::Generate { size, spacing } = cli.command {
        let started = Instant::now();
        let stats = synth::write_grid(&cli.data, cli.coastline.as_deref(), size, spacing)
            .with_context(|| format!("writing dataset to {}", cli.data.display()))?;
        println!(
            "wrote {} nodes and {} edges to {} in {:.2?}",
            stats.nodes,
            stats.edges,
            cli.data.display(),
            started.elapsed()
        );
        return Ok(());
    }

    let mut config = MapConfig::new(&cli.data).with_worker_threads(cli.workers);
    if let Some(dir) = &cli.coastline {
        config = config.with_coastline_dir(dir);
    }
    let mut model = MapModelBuilder::new(config)
        .observer(Progress)
        .build()
        .with_context(|| format!("loading map from {}", cli.data.display()))?;

    match cli.command {
        Command::Generate { .. } => {}
        Command::Info => print_info(&model),
        Command::Nearest { x, y, zoom } => {
            let p = Point::new(x, y);
            match model.nearest_with_distance(p, zoom) {
                Some((edge, d)) => println!("{} ({}) at {d:.1} m", display_name(edge.name_str()), edge.road_type),
                None => println!("no road within {} m", model.config().index.nearest_threshold),
            }
        }
        Command::Range { road_type, x0, y0, x1, y1 } => {
            let edges = model.edges_in(road_type, &Rect::new(x0, y0, x1, y1));
            println!("{} {road_type} edges", edges.len());
            for edge in edges {
                let anchor = edge.anchor();
                println!(
                    "  {:<24} {:>8.1} m  from ({:.1}, {:.1})",
                    display_name(edge.name_str()),
                    edge.length,
                    anchor.x,
                    anchor.y
                );
            }
        }
        Command::Route { x0, y0, x1, y1, metric } => {
            model.set_metric(metric);
            let route = model
                .route_between(Point::new(x0, y0), Point::new(x1, y1))
                .context("routing")?;
            print_route(route);
        }
    }
    Ok(())
}

fn print_info<O: MapObserver>(model: &MapModel<O>) {
    let info = model.info();
    let s = model.summary();
    println!(
        "extent      ({:.1}, {:.1}) .. ({:.1}, {:.1})",
        info.x_low, info.y_low, info.x_high, info.y_high
    );
    println!("nodes       {}", s.node_count);
    println!("edges       {} in {} road types", s.edge_count, s.batches);
    println!("arcs        {}", s.arc_count);
    println!("coastline   {} polygons", s.coastline_polygons);
    println!("load time   {:.2?}", s.elapsed);
    for rt in model.road_types() {
        if let Some(tree) = model.index(rt) {
            println!("  {:<16} {:>8} edges  depth {}", rt.as_str(), tree.len(), tree.depth());
        }
    }
    if !s.failed.is_empty() {
        let failed: Vec<&str> = s.failed.iter().map(|rt| rt.as_str()).collect();
        println!("failed      {}", failed.join(", "));
    }
}

fn print_route(route: &Route) {
    println!(
        "{} -> {} by {}: {:.1} m, {:.1} min, {} steps",
        route.source,
        route.target,
        route.metric,
        route.total_length(),
        route.total_drive_time(),
        route.steps.len()
    );
    let mut current: Option<&str> = None;
    for step in &route.steps {
        let name = display_name(step.edge.name_str());
        if current != Some(name) {
            println!("  {name}");
            current = Some(name);
        }
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "(unnamed)" } else { name }
}
