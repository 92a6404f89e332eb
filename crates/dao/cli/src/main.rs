//! daoctl - DAO governance command-line tool
//!
//! This CLI lets operators:
//! - Validate a DAO configuration and inspect its resources
//! - Replay a scripted governance session against a configured DAO

use anyhow::Context;
use clap::{Parser, Subcommand};
use dao_runtime::{DaoConfig, DaoCore, MemberDirectory, RecordingEventSink};
use dao_types::{EventEnvelope, Proposal};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod handlers;
mod script;

use script::{Script, StepOutcome};

/// daoctl application
#[derive(Parser)]
#[command(name = "daoctl")]
#[command(about = "DAO governance engine CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// DAO configuration file
    #[arg(short, long, env = "DAOCTL_CONFIG", global = true, default_value = "dao.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and list resources
    Check,

    /// Run a scripted session of proposals and votes
    Simulate {
        /// Session script (TOML list of steps)
        #[arg(short, long)]
        script: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Machine-readable simulation result
#[derive(Serialize)]
struct Report {
    dao: String,
    steps: Vec<StepOutcome>,
    proposals: Vec<Proposal>,
    events: Vec<EventEnvelope>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = DaoConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Check => check(&config),
        Commands::Simulate { script, json } => simulate(&config, &script, json),
    }
}

fn init_tracing(config: &DaoConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if config.logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn build(config: &DaoConfig) -> anyhow::Result<(DaoCore, Arc<RecordingEventSink>)> {
    let directory: Arc<dyn MemberDirectory> = Arc::new(config.directory());
    let sink = Arc::new(RecordingEventSink::new());
    let dao = DaoCore::from_config(config, directory, &handlers::provider, sink.clone())
        .context("failed to build DAO")?;
    Ok((dao, sink))
}

fn check(config: &DaoConfig) -> anyhow::Result<()> {
    let (dao, _) = build(config)?;

    println!("✓ {} is valid", dao.name());
    if !dao.description().is_empty() {
        println!("  {}", dao.description());
    }
    println!("  Members: {}", config.members.len());
    println!("  Policy: {:?}", config.resource_policy);

    println!("\nResources:");
    for resource in dao.resources() {
        println!(
            "  {:<28} {:<20} {}",
            resource.kind(),
            resource.display_name,
            resource.condition.render()
        );
    }

    let extensions = dao.extensions_list();
    if !extensions.is_empty() {
        println!("\nExtensions:");
        for ext in extensions {
            println!("  {} {} (query: {})", ext.path, ext.version, ext.query_path);
        }
    }
    Ok(())
}

fn simulate(config: &DaoConfig, script_path: &Path, json: bool) -> anyhow::Result<()> {
    let script = Script::load(script_path)?;
    let (mut dao, sink) = build(config)?;

    info!(dao = %dao.name(), steps = script.steps.len(), "Starting simulation");
    let outcomes = script::run(&mut dao, &script);

    if json {
        let report = Report {
            dao: dao.name().to_string(),
            steps: outcomes,
            proposals: dao.proposals(),
            events: sink.envelopes(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for outcome in &outcomes {
        let mark = if outcome.ok { "✓" } else { "✗" };
        println!(
            "{} {:>3} {:<8} {}",
            mark, outcome.index, outcome.step, outcome.detail
        );
    }

    println!("\nProposals:");
    for proposal in dao.proposals() {
        let line = dao
            .render_proposal(proposal.id)
            .unwrap_or_else(|_| format!("#{} {} [{}]", proposal.id, proposal.request.title, proposal.state));
        println!("  {line}");
    }

    let failed = outcomes.iter().filter(|o| !o.ok).count();
    println!(
        "\n{} steps, {} failed, {} events",
        outcomes.len(),
        failed,
        sink.envelopes().len()
    );
    Ok(())
}
