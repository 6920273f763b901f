//! Main entry point for the health-check binary
//!
//! Prints a consolidated report for the worker deployment in `--dir`. The exit
//! status is advisory (always 0) unless `--exit-code` is given.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use healthcheck::core::{parse_timeout, CheckSettings};
use healthcheck::{HealthCheckError, HealthCheckResult};
use shared::{component_debug, logging, ComponentId, WorkerLayout};

/// Health check for the worker process
#[derive(Parser)]
#[command(name = "health-check")]
#[command(about = "Reports whether the worker is running, reachable and configured")]
pub struct Args {
    /// Worker working directory (holds .env, worker.pid and logs/)
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Port of the worker's health/metrics server [default: METRICS_PORT or 8081]
    #[arg(long)]
    pub metrics_port: Option<u16>,

    /// Timeout in seconds for each HTTP probe
    #[arg(long, default_value_t = 5.0)]
    pub timeout: f64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 when the worker is DOWN
    #[arg(long)]
    pub exit_code: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> HealthCheckResult<ExitCode> {
    let args = Args::parse();

    ComponentId::init_health_check();
    logging::init_tracing_with_level(Some(&args.log_level));

    let timeout = parse_timeout(args.timeout)
        .ok_or_else(|| HealthCheckError::config(format!("Invalid timeout: {}", args.timeout)))?;

    let layout = WorkerLayout::new(&args.dir);
    let settings = CheckSettings::load(layout.clone(), args.metrics_port, timeout).await;
    component_debug!(ComponentId::current(), "⚙️ Resolved settings: {:?}", settings);

    let aggregator = healthcheck::real_aggregator(&layout, settings);
    let report = aggregator.aggregate().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    if args.exit_code && !report.is_up() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
