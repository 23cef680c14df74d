use dotenv::dotenv;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub jwt_secret: String,
    #[serde(default = "default_pool_size")]
    pub db_pool_size: u32,
}

fn default_port() -> u16 {
    3000
}

fn default_pool_size() -> u32 {
    10
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv().ok(); // Load .env file if present
        config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
