use crate::api::Backend;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://graph.imdbapi.dev/v1";
pub const DEFAULT_REST_BASE_URL: &str = "https://rest.imdbapi.dev";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub graphql_endpoint: String,
    pub rest_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub backend: Backend,
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Rest,
            cache_enabled: true,
            cache_ttl_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and the environment
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // simple-imdb.toml / .yaml / .json, if present
        config = config.add_source(config::File::with_name("simple-imdb").required(false));

        config = config.add_source(environment());

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Cache TTL, or `None` when caching is switched off
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.client
            .cache_enabled
            .then(|| Duration::from_secs(self.client.cache_ttl_secs))
    }
}

/// `IMDB_CLIENT__BACKEND=graphql` style variables
fn environment() -> config::Environment {
    config::Environment::with_prefix("IMDB")
        .separator("__")
        .prefix_separator("_")
}
