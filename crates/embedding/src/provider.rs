use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use vendormatch_common::{AppConfig, Result, VendorMatchError};

use crate::hashing::HashingEmbedder;
use crate::ollama::OllamaEmbedder;
use crate::similarity::cosine_similarity;

/// Source of text embeddings
///
/// Implementations must be deterministic for a given text so a catalog built
/// at startup stays comparable with query embeddings computed later.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text into a fixed-length vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Similarity between two embeddings (higher = more similar)
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }

    /// Model identifier
    fn model_name(&self) -> &str;

    /// Test connection/availability
    async fn test_connection(&self) -> Result<bool>;
}

/// Build the provider selected by `embedding_backend`
pub fn provider_from_config(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.embedding_backend.as_str() {
        "ollama" => Arc::new(OllamaEmbedder::new(
            &config.ollama_base_url,
            &config.embedding_model,
            config.embed_max_retries,
        )?),
        "hashing" => Arc::new(HashingEmbedder::new(config.hashing_dimension)),
        other => {
            return Err(VendorMatchError::config(format!(
                "Unknown embedding backend: {}",
                other
            )))
        }
    };

    info!(
        "Embedding provider ready - backend: {}, model: {}",
        config.embedding_backend,
        provider.model_name()
    );
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_config_hashing() {
        let mut config = AppConfig::default();
        config.embedding_backend = "hashing".to_string();
        config.hashing_dimension = 64;

        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.model_name(), "hashing-64");
    }

    #[test]
    fn test_provider_from_config_unknown_backend() {
        let mut config = AppConfig::default();
        config.embedding_backend = "openai".to_string();
        assert!(provider_from_config(&config).is_err());
    }
}
