//! `litterbug` – simulated object vision for a mapped robot
//!
//! This binary:
//!
//! 1. Loads `~/.litterbug/config.toml` (or `--config <path>`).
//! 2. Loads the occupancy map and seeds the item registry from `[[items]]`.
//! 3. Runs the vision loop, printing detections and, when `bridge_addr` is
//!    set, streaming them to WebSocket clients while accepting odometry.
//! 4. Stops cleanly on **Ctrl-C** and prints the scan statistics.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use colored::Colorize;
use tokio::sync::watch;
use tracing::{error, info, warn};

use litterbug_middleware::{BusSink, DetectionBridge, EventBus, Topic, TopicReceiver};
use litterbug_perception::OccupancyMap;
use litterbug_runtime::{
    ItemRegistry, PoseFeed, ScanStatsSnapshot, SharedPose, VisionLoop, VisionScanner, init_tracing,
};
use litterbug_types::{DetectionKind, EventPayload, LitterError};

use config::LitterbugConfig;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<PathBuf>,
    help: bool,
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            print_usage();
            return ExitCode::from(2);
        }
    };
    if args.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let cfg = match config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {e}", "Config error".red().bold());
            return ExitCode::FAILURE;
        }
    };

    // Hold the guard until exit so pending spans are flushed.
    let _guard = init_tracing(&cfg.core.service_name, &cfg.logging);
    print_banner();

    match run(cfg) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "litterbug stopped");
            eprintln!("{}: {e}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cfg: LitterbugConfig) -> Result<ScanStatsSnapshot, LitterError> {
    if !cfg.vision.enable_simulation {
        println!("  Vision simulation disabled; nothing to do.");
        return Ok(ScanStatsSnapshot::default());
    }

    let map = OccupancyMap::load(&cfg.map.file, &cfg.map.map_config())?;
    println!(
        "  Map {} loaded: {}×{} cells at {} m",
        cfg.map.file.display().to_string().bold(),
        map.grid().width(),
        map.grid().height(),
        map.resolution()
    );

    let registry = ItemRegistry::new();
    for item in cfg.items.iter().map(config::ItemConfig::to_item) {
        info!(id = %item.id, label = %item.label, "item registered");
        registry.insert(item);
    }
    let pose = SharedPose::new(cfg.pose.to_pose());
    let scanner = VisionScanner::seeded(cfg.vision.clone(), map)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| LitterError::Channel(format!("failed to start tokio runtime: {e}")))?;

    runtime.block_on(async move {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        if let Err(e) = ctrlc::set_handler(move || {
            println!();
            println!("{}", "⚠  Ctrl-C received – stopping the vision loop …".yellow().bold());
            let _ = shutdown_tx.send(true);
        }) {
            warn!(error = %e, "Failed to install Ctrl-C handler; stop the process with a signal instead");
        }

        let bus = EventBus::default();

        let feed = PoseFeed::new(pose.clone(), bus.clone());
        tokio::spawn(feed.run(shutdown_rx.clone()));

        tokio::spawn(print_detections(
            bus.subscribe_to(Topic::Detections),
            shutdown_rx.clone(),
        ));

        if let Some(addr) = cfg.core.bridge_addr {
            let bridge = DetectionBridge::new(bus.clone());
            tokio::spawn(async move {
                if let Err(e) = bridge.run_ws_server(addr).await {
                    error!(error = %e, "detection bridge failed");
                }
            });
            println!("  Detection bridge on {}", format!("ws://{addr}").bold());
        }

        println!(
            "  Scanning {} item(s) at {} Hz. Press {} to stop.\n",
            registry.len(),
            cfg.vision.fps,
            "Ctrl-C".bold()
        );

        let vision = VisionLoop::new(scanner, pose, registry, BusSink::new(bus));
        Ok(vision.run(shutdown_rx).await)
    })
}

async fn print_detections(mut detections: TopicReceiver, mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        tokio::select! {
            received = detections.recv() => match received {
                Ok(event) => {
                    if let EventPayload::ItemSpotted(d) = event.payload {
                        let kind = match d.kind {
                            DetectionKind::Observed => "seen".green(),
                            DetectionKind::Mislabeled => "mislabeled".yellow(),
                            DetectionKind::Ghost => "ghost".magenta(),
                        };
                        println!(
                            "  {:>10}  {:<12} ({:.2}, {:.2})",
                            kind,
                            d.label.bold(),
                            d.origin.x,
                            d.origin.y
                        );
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!(lagged_by = n, "console fell behind; detections skipped");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arguments
// ─────────────────────────────────────────────────────────────────────────────

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().ok_or_else(|| format!("{arg} needs a path"))?;
                parsed.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => parsed.help = true,
            other => return Err(format!("unexpected argument `{other}`")),
        }
    }
    Ok(parsed)
}

fn print_usage() {
    println!("Usage: litterbug [--config <path>]");
    println!();
    println!("  -c, --config <path>  Configuration file (default ~/.litterbug/config.toml)");
    println!("  -h, --help           Show this message");
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"   ___ __  __         __             "#.bold().cyan());
    println!("{}", r#"  / (_) /_/ /____ ___/ /  __ _____ _ "#.bold().cyan());
    println!("{}", r#" / / / __/ __/ -_) __/ _ \/ // / _ `/"#.bold().cyan());
    println!("{}", r#"/_/_/\__/\__/\__/_/ /_.__/\_,_/\_, / "#.bold().cyan());
    println!("{}", r#"                              /___/  "#.bold().cyan());
    println!();
    println!("  {} {}",
        "litterbug".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Simulated object vision");
    println!();
}

fn print_summary(summary: &ScanStatsSnapshot) {
    println!();
    println!("  {}", "Scan summary".bold());
    println!("    ticks          {} ({} skipped)", summary.ticks, summary.skipped_ticks);
    println!("    detections     {}", summary.detections);
    println!("    suppressed     {}", summary.suppressed);
    println!("    mislabeled     {}", summary.mislabeled);
    println!("    ghosts         {} ({} gave up)", summary.ghosts, summary.ghost_budget_exhausted);
    if summary.empty_label_set > 0 {
        println!("    {}  {} draw(s) with no known labels", "!".yellow(), summary.empty_label_set);
    }
}
