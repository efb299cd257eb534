use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use vendormatch_common::{Result, VendorMatchError};

use crate::provider::EmbeddingProvider;
use crate::types::{EmbedRequest, EmbedResponse};

/// Ollama embeddings API client
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    max_retries: u32,
    client: Client,
}

impl OllamaEmbedder {
    /// Create new Ollama embedder
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_retries: u32,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| VendorMatchError::embedding(format!("Failed to create HTTP client: {}", e)))?;

        info!("Ollama embedder initialized: {} (model: {})", base_url, model);
        Ok(Self {
            base_url,
            model,
            max_retries: max_retries.max(1),
            client,
        })
    }

    /// Embeddings endpoint URL
    fn embeddings_url(&self) -> String {
        format!("{}/api/embeddings", self.base_url)
    }

    /// Generate embedding with retry and exponential backoff
    async fn embed_with_retry(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.embeddings_url();

        debug!("Generating embedding - Model: {}, Text length: {}", self.model, text.len());

        let request = EmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let mut attempt = 1;
        loop {
            match self.try_embed(&url, &request).await {
                Ok(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                Err(e) if attempt < self.max_retries => {
                    let delay = std::time::Duration::from_millis(250 * 2u64.pow(attempt - 1));
                    warn!(
                        "Embedding request failed (attempt {}/{}): {}. Retrying in {:?}...",
                        attempt, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| VendorMatchError::embedding(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| VendorMatchError::embedding(format!("Ollama embedding API error: {}", e)))?;

        let result: EmbedResponse = response.json().await.map_err(|e| {
            VendorMatchError::embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        if result.embedding.is_empty() {
            return Err(VendorMatchError::embedding("Empty embedding from Ollama"));
        }

        Ok(result.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with_retry(text).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VendorMatchError::embedding(format!("Failed to connect to Ollama: {}", e)))?;
        Ok(response.status().is_success())
    }
}
