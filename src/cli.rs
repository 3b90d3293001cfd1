use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "series-sorter")]
#[command(about = "Interactively sort loose media files into a series/season library", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify everything under SOURCE and move it into LIBRARY
    Run {
        /// Directory tree of loose files to classify
        source: PathBuf,
        /// Root of the organized library
        library: PathBuf,
    },
    /// Print the series, seasons and episode counts in the catalog
    List,
    /// Print configuration values
    PrintConfig,
}
