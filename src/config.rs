use serde::Deserialize;
use std::time::Duration;

/// Value shipped in the sample `.env` file; treated as "no key configured"
const PLACEHOLDER_API_KEY: &str = "your_tmdb_api_key_here";

/// Which key-value store backs the expiring cache
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    File,
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key. Absent means the static fallback table is used.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    #[serde(default = "default_language")]
    pub tmdb_language: String,

    #[serde(default)]
    pub tmdb_region: Option<String>,

    /// Upper bound on a single catalog call, in seconds
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    #[serde(default = "default_cache_backend")]
    pub cache_backend: CacheBackend,

    /// Backing file for the `file` cache backend
    #[serde(default = "default_cache_path")]
    pub cache_path: String,

    /// Redis connection URL for the `redis` cache backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Optional byte budget for the memory and file stores
    #[serde(default)]
    pub cache_capacity_bytes: Option<usize>,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_cache_backend() -> CacheBackend {
    CacheBackend::File
}

fn default_cache_path() -> String {
    ".genre-ranker-cache.json".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// The catalog credential, if one is actually configured
    pub fn api_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }
}
