//! shortws - short workspace paths for build agents
//!
//! Operator and agent entry point for the workspace locator: shows which
//! workspace a job would get on an agent, reports the local path limit, and
//! dumps the effective configuration.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shortws_common::config::ShorteningConfigSources;
use shortws_common::{
    FixedPlatformProbe, JobIdentity, LocalPlatformProbe, LogConfig, PathDecision, PathLimit,
    PlatformKind, PlatformProbe, RemotePath, ShorteningConfig, Sourced, StaticNode,
    WorkspaceLocator, default_workspace, init_logging,
};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "shortws")]
#[command(author, version, about = "shortws - short workspace paths for build agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the workspace a job would use on an agent
    Locate(LocateArgs),

    /// Report this host's platform and maximum path length (JSON output)
    ///
    /// Run on an agent; the answer is what the locator probes for.
    Probe,

    /// Print the effective configuration and where each value came from
    Config,
}

#[derive(Args, Debug)]
struct LocateArgs {
    /// Workspace root on the agent (e.g. "C:\\Jenkins\\workspace")
    #[arg(short = 'r', long)]
    workspace_root: String,

    /// Hierarchical job name (e.g. "folder/sub/job")
    #[arg(short, long)]
    job: String,

    /// Leaf name, when it is not the last segment of --job
    #[arg(long)]
    name: Option<String>,

    /// Agent platform; defaults to the platform of this host
    #[arg(long, value_enum)]
    platform: Option<PlatformArg>,

    /// Assume this maximum path length instead of probing
    #[arg(long)]
    max_path: Option<u32>,

    /// Treat the node as the controller (never shortened)
    #[arg(long)]
    controller: bool,

    /// Override SHORTWS_BUILD_PATH_LENGTH
    #[arg(long)]
    build_path_length: Option<u32>,

    /// Print the full decision as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PlatformArg {
    Windows,
    Other,
}

impl From<PlatformArg> for PlatformKind {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Windows => PlatformKind::Windows,
            PlatformArg::Other => PlatformKind::Other,
        }
    }
}

#[derive(Debug, Serialize)]
struct LocateReport {
    job: String,
    default_path: RemotePath,
    workspace: RemotePath,
    build_path_length: Sourced<u32>,
    decision: PathDecision,
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    platform: PlatformKind,
    max_path_length: PathLimit,
}

#[derive(Debug, Serialize)]
struct ConfigReport<'a> {
    values: &'a ShorteningConfigSources,
    errors: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env("info").with_stderr();
    if cli.verbose {
        log_config = log_config.with_level("debug");
    }
    let _logging_guards = init_logging(&log_config)?;

    let loaded = ShorteningConfig::from_env();
    for err in &loaded.errors {
        warn!("{}, using default", err);
    }

    match cli.command {
        Commands::Locate(args) => {
            let budget = loaded.sources.build_path_length.clone();
            let report = locate(&args, loaded.config, budget);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.workspace);
            }
            Ok(())
        }
        Commands::Probe => {
            let platform = PlatformKind::current();
            let report = ProbeReport {
                platform,
                max_path_length: platform.max_path_length(),
            };
            println!("{}", serde_json::to_string(&report)?);
            Ok(())
        }
        Commands::Config => {
            let report = ConfigReport {
                values: &loaded.sources,
                errors: loaded.errors.iter().map(ToString::to_string).collect(),
            };
            let json = serde_json::to_string_pretty(&report)
                .context("failed to serialize configuration")?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn locate(args: &LocateArgs, config: ShorteningConfig, budget: Sourced<u32>) -> LocateReport {
    let budget = match args.build_path_length {
        Some(length) => Sourced::from_cli(length),
        None => budget,
    };
    let config = config.with_build_path_length(budget.value);

    let job = match &args.name {
        Some(name) => JobIdentity::new(args.job.clone(), name.clone()),
        None => JobIdentity::from_full_name(args.job.clone()),
    };
    let node = if args.controller {
        StaticNode::controller(args.workspace_root.as_str())
    } else {
        StaticNode::agent("cli", 0, args.workspace_root.as_str())
    };

    let probe: Arc<dyn PlatformProbe> = match args.platform {
        Some(platform) => Arc::new(FixedPlatformProbe(platform.into())),
        None => Arc::new(LocalPlatformProbe),
    };
    let locator = WorkspaceLocator::new(config, probe);
    if let Some(max_path) = args.max_path {
        locator.cache().put(node.identity.clone(), PathLimit(max_path));
    }

    let decision = locator.decide(&job, &node);
    debug!(job = %job, decision = ?decision, "Locate finished");

    let default_path = default_workspace(&RemotePath::new(args.workspace_root.as_str()), &job);
    let workspace = decision.path().cloned().unwrap_or_else(|| default_path.clone());
    LocateReport {
        job: job.full_name,
        default_path,
        workspace,
        build_path_length: budget,
        decision,
    }
}
