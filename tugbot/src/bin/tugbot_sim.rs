//! Bench simulator for the Tugbot governor
//!
//! Runs a scripted scenario against the full governor and logs telemetry.
//!
//! ```text
//! tugbot_sim --scenario ingress.toml --rate-hz 20
//! tugbot_sim --nv /tmp/tugbot.nv --json > run.jsonl
//! tugbot_sim --print-defaults > tugbot.toml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tugbot::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "tugbot_sim", version, about = "Run the Tugbot governor against a simulated vessel")]
struct Args {
    /// TOML configuration file (defaults when omitted)
    #[arg(long, conflicts_with = "nv")]
    config: Option<PathBuf>,

    /// Persisted configuration record; regenerated with defaults if missing or corrupt
    #[arg(long)]
    nv: Option<PathBuf>,

    /// TOML scenario file (built-in demo when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Control loop rate
    #[arg(long, default_value_t = 20)]
    rate_hz: u32,

    /// Simulated duration; defaults to the scenario's own length
    #[arg(long)]
    duration_s: Option<f64>,

    /// Sleep between ticks to run at wall-clock speed
    #[arg(long)]
    realtime: bool,

    /// Print one JSON actuator command per tick on stdout
    #[arg(long)]
    json: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_defaults: bool,
}

fn load_config(args: &Args) -> Result<TugbotConfig> {
    if let Some(path) = &args.config {
        return TugbotConfig::load_toml(path)
            .with_context(|| format!("loading configuration {}", path.display()));
    }
    if let Some(path) = &args.nv {
        let mut store = FileNvStore::new(path);
        let report = load_or_defaults(&mut store)
            .with_context(|| format!("reading configuration record {}", path.display()))?;
        if let LoadOutcome::Regenerated(reason) = &report.outcome {
            tracing::warn!("Configuration record regenerated: {}", reason);
        }
        return Ok(report.config);
    }
    Ok(TugbotConfig::default())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_defaults {
        print!("{}", TugbotConfig::default().to_toml_string()?);
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tugbot=info,tugbot_library=info,tugbot_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&args)?;
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::demo(),
    };
    tracing::info!(
        "Tugbot {} simulating '{}' at {} Hz",
        tugbot::version(),
        scenario.name,
        args.rate_hz
    );

    let report = CommandShaper::self_test();
    ensure!(
        report.all_passed(),
        "command shaper self-test failed: {} of {} checks",
        report.failed,
        report.checks.len()
    );

    let duration_ms = args.duration_s.map(|s| (s.max(0.0) * 1000.0) as u64);
    let mut sim = Simulation::new(&config, scenario, args.rate_hz);
    let period = Duration::from_millis(sim.period_ms());
    let wall = MonotonicClock::new();
    let json = args.json;
    let realtime = args.realtime;

    let on_tick = |now_ms: u64, command: &ActuatorCommand| {
        tracing::debug!("t={}ms {}", now_ms, command.log_summary());
        if json {
            match serde_json::to_string(command) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!("Failed to encode telemetry: {}", e),
            }
        }
        if realtime {
            std::thread::sleep(period);
        }
    };

    let summary = match duration_ms {
        Some(ms) => sim.run(ms, on_tick),
        None => sim.run_scenario(on_tick),
    };

    tracing::info!("{}", summary.log_summary());
    tracing::info!("Finished in {} ms wall time", wall.now_ms());
    Ok(())
}
