//! CLI Adapter.

use clap::{Parser, Subcommand};

use crate::app::{api, logging};
use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "flowdeploy")]
#[command(version)]
#[command(
    about = "Register data pipelines with the scheduler for the current environment",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register every declared pipeline (default)
    #[clap(visible_alias = "d")]
    Deploy {
        /// Print deployments instead of submitting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a flow locally
    #[clap(visible_alias = "r")]
    Run {
        /// Flow name (example-pipeline, healthcheck)
        flow: String,
        /// Environment passed to the flow (defaults to dev for pipelines)
        #[arg(short = 'e', long)]
        env: Option<String>,
    },
    /// Show the resolved environment and the signal that decided it
    Env,
    /// Resolve a secret from the environment or Secret Manager
    Secret {
        /// Secret identifier
        id: String,
        /// Secret version (defaults to latest)
        #[arg(long)]
        version: Option<String>,
        /// Print the secret value
        #[arg(long)]
        show: bool,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<(), AppError> = match cli.command {
        None => run_deploy(false),
        Some(Commands::Deploy { dry_run }) => run_deploy(dry_run),
        Some(Commands::Run { flow, env }) => run_flow(flow, env),
        Some(Commands::Env) => run_env(),
        Some(Commands::Secret { id, version, show }) => run_secret(&id, version.as_deref(), show),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_deploy(dry_run: bool) -> Result<(), AppError> {
    let outcome = api::deploy(dry_run)?;

    println!(
        "🌍 Environment: {} (from {})",
        outcome.resolution.environment,
        outcome.resolution.signal.label()
    );
    for deployment in &outcome.deployments {
        println!("✅ Deployed {} ({})", deployment.config.deployment_name, deployment.id);
    }
    Ok(())
}

fn run_flow(flow: String, env: Option<String>) -> Result<(), AppError> {
    match api::run_flow(api::RunOptions { flow, env })? {
        api::RunResult::Pipeline(report) => {
            println!(
                "✅ Loaded {} rows into {} ({})",
                report.rows_loaded, report.target.table_name, report.environment
            );
        }
        api::RunResult::Health(report) => {
            for line in report.lines() {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn run_env() -> Result<(), AppError> {
    let resolution = api::resolve_environment()?;
    println!("{}", resolution.environment);
    println!("  source: {}", resolution.signal.label());
    Ok(())
}

fn run_secret(id: &str, version: Option<&str>, show: bool) -> Result<(), AppError> {
    let secret = api::get_secret(Some(id), version)?;
    if show {
        println!("{}", secret.value);
    } else {
        println!("✅ Resolved {} from {}", id, secret.source.label());
    }
    Ok(())
}
