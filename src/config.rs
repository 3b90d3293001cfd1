use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub database_path: String,
    pub ignore_patterns: Vec<String>,
    /// Ask whether a directory's files all belong to the resolved context.
    pub confirm_files: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "series-sorter.db".to_string(),
            ignore_patterns: Vec::new(),
            confirm_files: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();

        let builder = Config::builder()
            .set_default("database_path", defaults.database_path)?
            .set_default("ignore_patterns", Vec::<String>::new())?
            .set_default("confirm_files", defaults.confirm_files)?
            // Values from 'Config.toml', if present
            .add_source(ConfigFile::with_name("Config").required(false))
            // e.g. SORTER_DATABASE_PATH=/tmp/library.db
            .add_source(
                Environment::with_prefix("SORTER")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("ignore_patterns"),
            )
            .build()?;

        builder.try_deserialize::<AppConfig>()
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
