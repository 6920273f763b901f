//! Main entry point for the workerctl binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use healthcheck::core::{parse_timeout, CheckSettings};
use healthcheck::services::DEFAULT_PROBE_TIMEOUT;
use shared::{component_debug, logging, ComponentId, WorkerLayout};
use workerctl::{AttachedExit, ControllerError, ControllerResult, StartOutcome, StopOutcome, Termination};

/// Start, stop and inspect the worker process
#[derive(Parser)]
#[command(name = "workerctl")]
#[command(about = "Lifecycle controller for the worker process")]
pub struct Args {
    /// Worker working directory (holds venv/, .env, worker.pid and logs/)
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker
    Start {
        /// Run in the background and record the pid in worker.pid
        #[arg(long)]
        daemon: bool,

        /// Seconds the worker gets to exit after SIGTERM when interrupted
        #[arg(long, default_value_t = 10.0)]
        timeout: f64,
    },
    /// Stop the worker recorded in worker.pid
    Stop {
        /// Seconds to wait after SIGTERM before SIGKILL
        #[arg(long, default_value_t = 10.0)]
        timeout: f64,
    },
    /// Stop the worker if it runs, then start it in the background
    Restart {
        /// Seconds to wait after SIGTERM before SIGKILL
        #[arg(long, default_value_t = 10.0)]
        timeout: f64,
    },
    /// Print the worker health report
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn grace(seconds: f64) -> ControllerResult<std::time::Duration> {
    parse_timeout(seconds).ok_or_else(|| ControllerError::config(format!("Invalid timeout: {seconds}")))
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

async fn run(args: Args) -> ControllerResult<ExitCode> {
    let layout = WorkerLayout::new(&args.dir);
    // Resolves LOG_FILE so detached output lands where the worker logs
    let settings = CheckSettings::load(layout.clone(), None, DEFAULT_PROBE_TIMEOUT).await;
    component_debug!(ComponentId::current(), "⚙️ Resolved settings: {:?}", settings);

    let controller = workerctl::real_controller(layout.clone()).with_log_file(&settings.log_path);

    match args.command {
        Command::Start { daemon, timeout } => match controller.with_grace(grace(timeout)?).start(daemon).await? {
            StartOutcome::Daemonized { pid } => {
                println!("Worker started in background (PID {pid})");
                println!("Log: {}", settings.log_path.display());
                Ok(ExitCode::SUCCESS)
            }
            StartOutcome::Attached(AttachedExit::Exited(code)) => Ok(exit_code(code)),
            StartOutcome::Attached(AttachedExit::Interrupted) => {
                logging::log_shutdown(ComponentId::current(), "worker stopped on signal");
                Ok(ExitCode::SUCCESS)
            }
        },
        Command::Stop { timeout } => {
            match controller.with_grace(grace(timeout)?).stop().await? {
                StopOutcome::Stopped { pid, termination } => match termination {
                    Termination::Killed => println!("Worker {pid} killed after grace period"),
                    Termination::Graceful | Termination::AlreadyGone => println!("Worker {pid} stopped"),
                },
                StopOutcome::StaleRemoved => println!("Worker was not running; removed stale worker.pid"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Restart { timeout } => {
            let StartOutcome::Daemonized { pid } = controller.with_grace(grace(timeout)?).restart().await? else {
                return Ok(ExitCode::FAILURE);
            };
            println!("Worker restarted in background (PID {pid})");
            Ok(ExitCode::SUCCESS)
        }
        Command::Status { json } => {
            let report = healthcheck::real_aggregator(&layout, settings).aggregate().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    ComponentId::init_controller();
    logging::init_tracing_with_level(Some(&args.log_level));

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            logging::log_error(ComponentId::current(), "workerctl", &e);
            ExitCode::FAILURE
        }
    }
}
