use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub oracle_base_url: String,
    pub oracle_api_key: String,
    pub oracle_timeout_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017/cityquest".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "cityquest".to_string());

        let oracle_base_url = settings
            .get_string("oracle.base_url")
            .or_else(|_| env::var("ORACLE_BASE_URL"))
            .unwrap_or_else(|_| "https://rsapi.goong.io".to_string());

        let oracle_api_key = settings
            .get_string("oracle.api_key")
            .or_else(|_| env::var("ORACLE_API_KEY"))
            .unwrap_or_else(|_| {
                if env == "prod" {
                    panic!("FATAL: ORACLE_API_KEY must be set in production!");
                }
                eprintln!("WARNING: Using empty ORACLE_API_KEY (dev mode only!)");
                String::new()
            });

        let oracle_timeout_secs = settings
            .get_string("oracle.timeout_secs")
            .ok()
            .or_else(|| env::var("ORACLE_TIMEOUT_SECS").ok())
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(5);

        Ok(Config {
            mongo_uri,
            mongo_database,
            oracle_base_url,
            oracle_api_key,
            oracle_timeout_secs,
        })
    }
}
