//! Swarmgraph headless demo runner.
//!
//! Runs the signal simulation over a graph without a renderer and reports
//! what happened.
//!
//! Usage:
//!   # Ten seconds of the built-in support-desk graph
//!   cargo run -p swarmgraph-cli -- --frames 600
//!
//!   # Custom graph and engine tuning, final frame as JSON
//!   cargo run -p swarmgraph-cli -- --graph graph.json --config engine.json --snapshot
//!
//!   # Pace frames against the wall clock
//!   RUST_LOG=swarmgraph_sim=trace cargo run -p swarmgraph-cli -- --realtime

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use swarmgraph_graph::{GraphDocument, GraphStore};
use swarmgraph_sim::{EngineConfig, Sandbox};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Highest frame rate the interval timer can pace.
const MAX_FPS: f64 = 1000.0;

/// Run the swarmgraph signal simulation headless.
#[derive(Parser, Debug)]
#[command(name = "swarmgraph-demo")]
#[command(about = "Headless runner for the swarmgraph signal simulation")]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Graph document JSON (defaults to the demo graph)
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Screen width used for view presets and node placement
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Screen height used for view presets and node placement
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Print the final frame snapshot as JSON
    #[arg(long)]
    snapshot: bool,

    /// Pace frames with a wall-clock interval instead of synthetic timestamps
    #[arg(long)]
    realtime: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    check_fps(args.fps)?;

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading engine config");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut sandbox = match &args.graph {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading graph");
            let store = GraphStore::from_document(GraphDocument::load(path)?)?;
            Sandbox::new(store, config, args.width, args.height)
        }
        None => Sandbox::demo(config, args.width, args.height)?,
    };

    tracing::info!(
        nodes = sandbox.store().node_count(),
        edges = sandbox.store().edge_count(),
        frames = args.frames,
        fps = args.fps,
        seed = sandbox.engine().config().seed,
        "starting simulation"
    );

    let frame_ms = 1000.0 / args.fps;
    let report_every = (args.fps.round() as u64).max(1);
    sandbox.start();

    // The first frame only sets the baseline, so run one extra.
    if args.realtime {
        let mut interval = tokio::time::interval(Duration::from_secs_f64(frame_ms / 1000.0));
        let origin = Instant::now();
        for frame in 0..=args.frames {
            interval.tick().await;
            let timestamp = origin.elapsed().as_secs_f64() * 1000.0;
            step(&mut sandbox, frame, timestamp, report_every);
        }
    } else {
        for frame in 0..=args.frames {
            step(&mut sandbox, frame, frame as f64 * frame_ms, report_every);
        }
    }

    let snapshot = sandbox.snapshot();
    sandbox.stop();

    let stats = &snapshot.stats;
    tracing::info!(
        ticks = stats.ticks,
        spawned = stats.signals_spawned,
        delivered = stats.signals_delivered,
        dropped = stats.signals_dropped,
        trigger_fires = stats.trigger_fires,
        in_flight = snapshot.signals.len(),
        clock_ms = snapshot.clock_ms,
        "simulation finished"
    );

    if args.snapshot {
        println!("{}", snapshot.to_json()?);
    } else {
        println!("Swarmgraph Simulation");
        println!("=====================");
        println!("  Simulated: {:.1} s over {} ticks", snapshot.clock_ms / 1000.0, stats.ticks);
        println!("  Trigger fires: {}", stats.trigger_fires);
        println!("  Signals spawned: {}", stats.signals_spawned);
        println!("  Signals delivered: {}", stats.signals_delivered);
        println!("  Signals in flight: {}", snapshot.signals.len());
        println!("  Nodes processing: {}", snapshot.processing.len());
    }

    Ok(())
}

fn check_fps(fps: f64) -> Result<(), String> {
    if fps.is_finite() && fps > 0.0 && fps <= MAX_FPS {
        Ok(())
    } else {
        Err(format!("--fps must be in (0, {MAX_FPS}], got {fps}"))
    }
}

fn step(sandbox: &mut Sandbox, frame: u64, timestamp: f64, report_every: u64) {
    let Some(report) = sandbox.on_frame(timestamp) else {
        return;
    };
    if let Some(trigger) = &report.fired {
        tracing::debug!(frame, %trigger, spawned = report.spawned, "trigger fired");
    }
    if frame % report_every == 0 {
        tracing::debug!(
            frame,
            live = report.live,
            processing = sandbox.engine().processing().len(),
            "progress"
        );
    }
}
