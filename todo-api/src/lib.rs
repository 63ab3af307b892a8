pub mod config {
    use serde::Deserialize;

    /// Storage used when `DATABASE_URL` is unset or empty.
    pub const SQLITE_FALLBACK_URL: &str = "sqlite://todos.db?mode=rwc";

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        #[serde(default)]
        pub database_url: Option<String>,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_cors_origin")]
        pub cors_origin: String,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_environment(config::Environment::default())
        }

        /// Loads configuration from the given environment source.
        pub fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Returns the configured connection string, or the local SQLite file store.
        pub fn connection_url(&self) -> &str {
            self.database_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .unwrap_or(SQLITE_FALLBACK_URL)
        }
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                database_url: None,
                port: default_port(),
                cors_origin: default_cors_origin(),
            }
        }
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_cors_origin() -> String {
        "https://34.239.116.28".to_string()
    }

}
pub mod entities;
pub mod todo;
pub mod web;
