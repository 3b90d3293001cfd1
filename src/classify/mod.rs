pub mod matcher;
pub mod resolver;
pub mod walker;

pub use resolver::{assign_season, assign_series};
pub use walker::Walker;
