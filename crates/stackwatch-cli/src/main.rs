//! Stackwatch - CloudFormation deployments for CI
//!
//! Usage:
//!   stackwatch apply -p <name> --template-path <file> --parameter-path <file>
//!   stackwatch destroy -p <name>
//!   stackwatch version

mod version;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stackwatch_core::config::{Settings, SettingsStore, WatchConfig};
use stackwatch_core::deploy::{ChangesetReport, DestroyOutcome, ExecuteOutcome, Orchestrator};
use stackwatch_core::provider::AwsCloudFormation;
use stackwatch_core::report::TracingReporter;
use stackwatch_core::template::{self, TemplateInput};

#[derive(Parser)]
#[command(name = "stackwatch")]
#[command(about = "CLI for running AWS CloudFormation in CI", long_about = None)]
struct Cli {
    /// Path to a stackwatch.toml settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log per-poll progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format of the final summary
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update a CloudFormation stack
    Apply(ApplyArgs),

    /// Destroy a CloudFormation stack
    Destroy(StackArgs),

    /// Version of the stackwatch CLI
    #[command(alias = "v")]
    Version,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Args)]
struct StackArgs {
    /// Package name, used as the stack name
    #[arg(short = 'p', long = "package-name")]
    package_name: String,

    /// AWS region
    #[arg(short, long)]
    region: Option<String>,

    /// Seconds to wait for resources to finish; this does not cancel the CloudFormation run
    #[arg(long)]
    timeout: Option<u64>,

    /// Seconds between each poll of the AWS API for updates
    #[arg(long = "poll-interval")]
    poll_interval: Option<u64>,
}

#[derive(Args)]
struct ApplyArgs {
    #[command(flatten)]
    stack: StackArgs,

    /// Path to the CloudFormation template
    #[arg(long = "template-path")]
    template_path: PathBuf,

    /// Path to the CloudFormation input vars (JSON)
    #[arg(long = "parameter-path")]
    parameter_path: PathBuf,
}

#[derive(Serialize)]
struct ApplySummary<'a> {
    stack_name: &'a str,
    changeset: &'a ChangesetReport,
    outcome: ExecuteOutcome,
}

#[derive(Serialize)]
struct DestroySummary<'a> {
    stack_name: &'a str,
    outcome: DestroyOutcome,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "stackwatch=debug,info"
    } else {
        "stackwatch=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli).await {
        tracing::error!(error = %format!("{err:#}"), "command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Apply(args) => {
            let settings = load_settings(cli.config)?;
            run_apply(args, &settings, cli.format).await
        }
        Commands::Destroy(args) => {
            let settings = load_settings(cli.config)?;
            run_destroy(args, &settings, cli.format).await
        }
        Commands::Version => {
            println!(
                "stackwatch version {}, sha {}",
                version::version(),
                version::git_sha()
            );
            Ok(())
        }
    }
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    let store = match path {
        Some(path) => SettingsStore::from_file(path),
        None => SettingsStore::from_default_paths()?,
    };
    store.load()
}

/// Flags win over the settings file, which wins over built-in defaults.
fn watch_config(args: &StackArgs, settings: &Settings) -> Result<WatchConfig> {
    let mut config = WatchConfig::new(&args.package_name);
    if let Some(timeout) = args.timeout.map(Duration::from_secs).or(settings.timeout()) {
        config = config.with_timeout(timeout);
    }
    if let Some(interval) = args
        .poll_interval
        .map(Duration::from_secs)
        .or(settings.poll_interval())
    {
        config = config.with_poll_interval(interval);
    }
    config.validate()?;
    Ok(config)
}

async fn orchestrator(args: &StackArgs, settings: &Settings) -> Result<Orchestrator> {
    let config = watch_config(args, settings)?;
    let region = args.region.clone().or_else(|| settings.region.clone());
    let api = AwsCloudFormation::from_env(region).await;
    Ok(Orchestrator::new(
        config,
        Arc::new(api),
        Arc::new(TracingReporter),
    ))
}

async fn run_apply(args: ApplyArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let template = template::read(&TemplateInput {
        template_path: args.template_path.clone(),
        parameter_path: args.parameter_path.clone(),
    })?;

    let orchestrator = orchestrator(&args.stack, settings).await?;
    let changeset = orchestrator
        .create_changeset(&template.template_body, &template.parameters)
        .await?;
    let outcome = orchestrator.execute().await?;

    let summary = ApplySummary {
        stack_name: orchestrator.stack_id(),
        changeset: &changeset,
        outcome,
    };
    match format {
        OutputFormat::Text => match outcome {
            ExecuteOutcome::NoChanges => {
                println!("• Stack '{}' is up to date", summary.stack_name)
            }
            ExecuteOutcome::Completed => println!(
                "✓ Applied changeset {} to stack '{}'",
                changeset.changeset_id, summary.stack_name
            ),
            ExecuteOutcome::TimedOut => println!(
                "⚠ Stopped watching stack '{}' after the timeout; the update continues in CloudFormation",
                summary.stack_name
            ),
        },
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

async fn run_destroy(args: StackArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let orchestrator = orchestrator(&args, settings).await?;
    let outcome = orchestrator.destroy().await?;

    let summary = DestroySummary {
        stack_name: orchestrator.stack_id(),
        outcome,
    };
    match format {
        OutputFormat::Text => match outcome {
            DestroyOutcome::StackAbsent => {
                println!("• Stack '{}' does not exist", summary.stack_name)
            }
            DestroyOutcome::Deleted => println!("✓ Destroyed stack '{}'", summary.stack_name),
            DestroyOutcome::TimedOut => println!(
                "⚠ Stopped watching stack '{}' after the timeout; the deletion continues in CloudFormation",
                summary.stack_name
            ),
        },
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
