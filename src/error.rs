use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A caller handed an operation something it must never receive.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The catalog no longer agrees with what was read from it moments ago.
    #[error("Catalog consistency error: {0}")]
    Consistency(String),

    #[error("Input closed while waiting for an answer")]
    InputClosed,

    #[error(
        "Episode {episode_id} was cataloged at {} but moving {} there failed: {cause}",
        .destination.display(),
        .origin.display()
    )]
    MoveDiverged {
        episode_id: i64,
        origin: PathBuf,
        destination: PathBuf,
        cause: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
