use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use toolchain_advisor::advisor::Advisor;
use toolchain_advisor::config::{self, AdvisorConfig};
use toolchain_advisor::diagnostics::{CompositeSink, FileSink, LogSink};
use toolchain_advisor::logging;
use toolchain_advisor::probe::{EnvironmentProbe, FixedProbe, GoToolchainProbe};
use toolchain_advisor::report::report;
use toolchain_advisor::workspace::GoModScanner;

#[derive(Parser)]
#[command(name = "toolchain-advisor")]
#[command(
    version,
    about = "Print the Go version a build pipeline should install for a workspace"
)]
struct Cli {
    /// Workspace root to scan for go.mod files
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use this installed Go version instead of querying the go binary
    #[arg(long, conflicts_with = "no_go_env")]
    go_env_version: Option<String>,

    /// Assume no Go installation is present
    #[arg(long)]
    no_go_env: bool,

    /// Write logs to the data directory instead of stderr
    #[arg(long)]
    log_file: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = if cli.log_file {
        Some(logging::init_file(&config::log_path())?)
    } else {
        logging::init_stderr();
        None
    };

    let config = AdvisorConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let range = config
        .supported_range()
        .context("Invalid supported version range")?;

    let probe: Box<dyn EnvironmentProbe> = if cli.no_go_env {
        Box::new(FixedProbe(None))
    } else if let Some(version) = cli.go_env_version {
        Box::new(FixedProbe(Some(version)))
    } else {
        Box::new(GoToolchainProbe::new(&config.go_binary))
    };

    let mut sink = CompositeSink::new().with(LogSink);
    if let Some(dir) = &config.diagnostic_dir {
        sink = sink.with(FileSink::new(dir));
    }

    let recommendation = Advisor::new(range).identify_environment(
        &GoModScanner::new(&cli.workspace),
        probe.as_ref(),
        &sink,
    );

    report(&config.toolchain, recommendation.version_to_install());
    Ok(())
}
