use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use bulwark_app::game_loop::{drive_waves, GameLoop, Pacing, WavePlan};
use bulwark_app::state::{DeployOrder, WaveReport};
use bulwark_core::config::MatchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "bulwark")]
#[command(about = "Run defense waves headless and report the score of each")]
struct Args {
    /// Match configuration (JSON). Defaults apply to every missing field.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of waves to play.
    #[arg(long, default_value_t = 1)]
    waves: u32,
    /// Override the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Sim seconds a wave may run before it is abandoned.
    #[arg(long, default_value_t = 300.0)]
    max_secs: f64,
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    /// Pace ticks at 30 Hz wall-clock instead of as fast as possible.
    #[arg(long)]
    realtime: bool,
    /// Defense placed at every wave start, as `key@x,y`. Repeatable.
    #[arg(long = "deploy")]
    deploys: Vec<DeployOrder>,
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init(),
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn print_report(report: &WaveReport, format: LogFormat) {
    match format {
        LogFormat::Json => match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(e) => error!(%e, "report not serializable"),
        },
        LogFormat::Text => {
            let stars = "*".repeat(report.verdict.stars as usize);
            let status = if report.timed_out {
                "timed out"
            } else if report.verdict.success {
                "held"
            } else {
                "breached"
            };
            println!(
                "wave {:>2}  {:<9}  intercepts {:>2}  failures {:>2}  spawned {:>2}  {:>6.1}s  {stars}",
                report.wave,
                status,
                report.verdict.score,
                report.failures,
                report.spawned,
                report.duration_secs,
            );
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_format);

    let mut config = match &args.config {
        Some(path) => match MatchConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!(%e, path = %path.display(), "failed to load match config");
                return ExitCode::FAILURE;
            }
        },
        None => MatchConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    for order in &args.deploys {
        if config.defense(&order.key).is_none() {
            error!(key = %order.key, "deploy names a defense missing from the catalog");
            return ExitCode::FAILURE;
        }
    }

    let rating = config.rating.clone();
    let pacing = if args.realtime {
        Pacing::Realtime
    } else {
        Pacing::Unthrottled
    };
    info!(seed = config.seed, waves = args.waves, ?pacing, "starting match");

    let game_loop = match GameLoop::spawn(config, pacing) {
        Ok(game_loop) => game_loop,
        Err(e) => {
            error!(%e, "failed to spawn game loop thread");
            return ExitCode::FAILURE;
        }
    };

    let plan = WavePlan {
        waves: args.waves,
        max_secs: args.max_secs,
        deploys: args.deploys,
    };
    let reports = drive_waves(&game_loop, &plan, &rating);
    game_loop.shutdown();

    for report in &reports {
        print_report(report, args.log_format);
    }

    let total: u32 = reports.iter().map(|r| r.verdict.score).sum();
    info!(waves = reports.len(), total_intercepts = total, "match finished");
    ExitCode::SUCCESS
}
