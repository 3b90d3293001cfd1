pub mod classify;
pub mod config;
pub mod error;
pub mod library;
pub mod model;
pub mod storage;
pub mod summary;
pub mod utils;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use library::FileMover;
pub use model::{Context, Episode, Season, Series};
pub use storage::Catalog;
