use anyhow::Context;
use colored::Colorize;

use rem_engine::RemEngine;
use rem_server::{RemServer, ServerConfig};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = build_config(&args.sources)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(prefix) = args.prefix {
        config.api_prefix = prefix;
    }

    let server = RemServer::new(config)?;
    println!(
        "{} REM server on {} (api prefix '{}')",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().normalized_prefix()
    );
    for source in server.state().engine.default_dataset() {
        println!("  dataset: {}", source.display().to_string().cyan());
    }

    let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = build_config(&args.sources)?;
    let sources = config.dataset_sources()?;
    if sources.is_empty() {
        println!("No dataset sources configured.");
        return Ok(());
    }

    let root = RemEngine::new().configure(sources).load_root()?;
    for (name, dataset) in root.iter() {
        println!(
            "  {} {} ({} entries, next id {})",
            "✓".green(),
            name.yellow().bold(),
            dataset.len(),
            dataset.next_id()
        );
    }
    println!("{} {} dataset(s) loaded.", "✓".green().bold(), root.len());
    Ok(())
}

/// Config file first, then command-line sources on top.
fn build_config(args: &SourceArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?,
        None => ServerConfig::default(),
    };
    config.datasets.extend(args.datasets.iter().cloned());
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    Ok(config)
}
