use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rem",
    about = "REM: a session-scoped REST mock server over JSON datasets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the mock REST API
    Serve(ServeArgs),
    /// Load every dataset source once and report what it contains
    Check(CheckArgs),
}

/// Where dataset sources come from.
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory whose *.json files are dataset sources
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Dataset source files, loaded in order
    pub datasets: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Path prefix of the REST routes
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
}
