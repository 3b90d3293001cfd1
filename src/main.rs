mod cli;
mod logging;

use anyhow::Context as _;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use colored::*;
use dotenv::dotenv;
use series_sorter::classify::Walker;
use series_sorter::utils::prompt::LinePrompt;
use series_sorter::{summary, AppConfig, Catalog, FileMover};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };
    debug!("config: {:?}", config);

    let result = match args.command {
        Some(Commands::Run { source, library }) => run(&config, &source, &library),
        Some(Commands::List) => list(&config),
        Some(Commands::PrintConfig) => print_config(&config),
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {:#}", err);
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

/// Opens the catalog, hands it to `work`, and closes it whatever `work` returns.
fn with_catalog<T>(
    config: &AppConfig,
    work: impl FnOnce(&Catalog) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let catalog = Catalog::open(&config.database_path)
        .with_context(|| format!("opening catalog at {}", config.database_path))?;

    let result = work(&catalog);
    let closed = catalog.close().context("closing catalog");

    let value = result?;
    closed?;
    Ok(value)
}

fn run(config: &AppConfig, source: &Path, library: &Path) -> anyhow::Result<()> {
    with_catalog(config, |catalog| {
        let mover = FileMover::new(library);
        mover
            .init()
            .with_context(|| format!("preparing library at {}", library.display()))?;

        let mut prompt = LinePrompt::console();
        let mut walker = Walker::new(catalog, &mover, &mut prompt)
            .with_ignore_patterns(&config.ignore_patterns)
            .with_file_confirmation(config.confirm_files);

        let stats = walker
            .process_root(source)
            .with_context(|| format!("processing {}", source.display()))?;
        info!(
            "{} episodes filed ({} declined and left unclassified), {} entries ignored",
            stats.episodes, stats.deferred, stats.ignored
        );

        summary::print_summary(&summary::summarize(catalog)?);
        Ok(())
    })
}

fn list(config: &AppConfig) -> anyhow::Result<()> {
    with_catalog(config, |catalog| {
        summary::print_summary(&summary::summarize(catalog)?);
        Ok(())
    })
}

fn print_config(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", config.to_toml()?);
    Ok(())
}
