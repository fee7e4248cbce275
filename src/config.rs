use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Catalog location: a JSON file path or an http(s) URL
    #[serde(default = "default_catalog_source")]
    pub catalog_source: String,

    /// Redis connection URL. Reading state is kept in memory when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Redis hash holding the per-book reading state
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_source() -> String {
    "data/books.json".to_string()
}

fn default_storage_key() -> String {
    "techtopia_reading_data".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
