use crate::error::VendorMatchError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Embedding backends understood by the binary
pub const EMBEDDING_BACKENDS: &[&str] = &["ollama", "hashing"];

/// Feature pooling policies understood by the matcher
pub const FEATURE_POOLINGS: &[&str] = &["max", "mean"];

/// VendorMatch application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Vendor dataset file (.csv, .json or .jsonl)
    pub dataset_path: PathBuf,

    /// Embedding backend ("ollama" or "hashing")
    pub embedding_backend: String,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Vector size of the offline hashing embedder
    pub hashing_dimension: usize,

    /// Concurrent embedding calls while building the catalog
    pub embed_concurrency: usize,

    /// Attempts per embedding call before giving up
    pub embed_max_retries: u32,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Minimum combined score for a vendor to be returned
    pub match_threshold: f64,

    /// Weight of the capability score in the combined score
    pub capability_weight: f64,

    /// Weight of the category score in the combined score
    pub category_weight: f64,

    /// Maximum number of vendors returned per request
    pub top_k: usize,

    /// How feature similarities are pooled per vendor ("max" or "mean")
    pub feature_pooling: String,

    /// Per-request deadline in seconds
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("./data/vendors.csv"),
            embedding_backend: "ollama".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "all-minilm".to_string(),
            hashing_dimension: 384,
            embed_concurrency: 8,
            embed_max_retries: 3,
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
            match_threshold: 0.5,
            capability_weight: 0.7,
            category_weight: 0.3,
            top_k: 10,
            feature_pooling: "max".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, VendorMatchError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();
        let config = Self {
            dataset_path: Self::get_env_path("DATASET_PATH").unwrap_or(defaults.dataset_path),
            embedding_backend: std::env::var("EMBEDDING_BACKEND")
                .unwrap_or(defaults.embedding_backend),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            embedding_model: std::env::var("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            hashing_dimension: Self::get_env_parsed("HASHING_DIMENSION")
                .unwrap_or(defaults.hashing_dimension),
            embed_concurrency: Self::get_env_parsed("EMBED_CONCURRENCY")
                .unwrap_or(defaults.embed_concurrency),
            embed_max_retries: Self::get_env_parsed("EMBED_MAX_RETRIES")
                .unwrap_or(defaults.embed_max_retries),
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            match_threshold: Self::get_env_parsed("MATCH_THRESHOLD")
                .unwrap_or(defaults.match_threshold),
            capability_weight: Self::get_env_parsed("CAPABILITY_WEIGHT")
                .unwrap_or(defaults.capability_weight),
            category_weight: Self::get_env_parsed("CATEGORY_WEIGHT")
                .unwrap_or(defaults.category_weight),
            top_k: Self::get_env_parsed("TOP_K").unwrap_or(defaults.top_k),
            feature_pooling: std::env::var("FEATURE_POOLING").unwrap_or(defaults.feature_pooling),
            request_timeout_secs: Self::get_env_parsed("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
        };

        config.ensure_directories()?;

        Ok(config)
    }

    /// Load configuration from a file, with `VENDORMATCH_*` environment overrides
    ///
    /// The format is picked from the file extension (toml, json, yaml, ...).
    /// Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, VendorMatchError> {
        let _ = dotenv::dotenv();

        let config: Self = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("VENDORMATCH"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                VendorMatchError::config(format!(
                    "Failed to load config file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Get a parsed value from environment variable, ignoring unparsable values
    fn get_env_parsed<T: FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), VendorMatchError> {
        if !self.log_dir.exists() {
            std::fs::create_dir_all(&self.log_dir).map_err(|e| {
                VendorMatchError::config(format!(
                    "Failed to create directory {}: {}",
                    self.log_dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Get log file path
    pub fn get_log_path(&self, filename: &str) -> PathBuf {
        self.log_dir.join(filename)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), VendorMatchError> {
        if !EMBEDDING_BACKENDS.contains(&self.embedding_backend.as_str()) {
            return Err(VendorMatchError::config(format!(
                "Unknown embedding backend '{}' (expected one of {:?})",
                self.embedding_backend, EMBEDDING_BACKENDS
            )));
        }

        if self.embedding_model.is_empty() {
            return Err(VendorMatchError::config("Embedding model name cannot be empty"));
        }

        if self.embedding_backend == "ollama"
            && !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://")
        {
            return Err(VendorMatchError::config(
                "Ollama base URL must start with http:// or https://",
            ));
        }

        if self.hashing_dimension == 0 {
            return Err(VendorMatchError::config("Hashing dimension cannot be 0"));
        }

        if self.embed_concurrency == 0 {
            return Err(VendorMatchError::config("Embedding concurrency cannot be 0"));
        }

        if self.server_port == 0 {
            return Err(VendorMatchError::config("Server port cannot be 0"));
        }

        if !(-1.0..=1.0).contains(&self.match_threshold) {
            return Err(VendorMatchError::config("Match threshold must be within [-1, 1]"));
        }

        for (name, weight) in [
            ("Capability", self.capability_weight),
            ("Category", self.category_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(VendorMatchError::config(format!(
                    "{} weight must be within [0, 1]",
                    name
                )));
            }
        }

        if self.top_k == 0 {
            return Err(VendorMatchError::config("top_k cannot be 0"));
        }

        if !FEATURE_POOLINGS.contains(&self.feature_pooling.as_str()) {
            return Err(VendorMatchError::config(format!(
                "Unknown feature pooling '{}' (expected one of {:?})",
                self.feature_pooling, FEATURE_POOLINGS
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(VendorMatchError::config("Request timeout cannot be 0"));
        }

        crate::logger::parse_log_level(&self.log_level)?;

        Ok(())
    }
}
