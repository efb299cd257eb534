//! Offline feature-hashing embedder
//!
//! Each alphanumeric token is hashed with SHA-256 into one signed bucket of a
//! fixed-size vector, which is then L2-normalized. Texts sharing words get a
//! positive cosine similarity; no model or network is needed, which makes it
//! suitable for local runs and tests.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;
use vendormatch_common::Result;

use crate::provider::EmbeddingProvider;
use crate::similarity::l2_normalize_in_place;

/// Deterministic bag-of-words embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    model_name: String,
}

impl HashingEmbedder {
    /// Create a hashing embedder producing `dimension`-sized vectors
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model_name: format!("hashing-{}", dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Synchronous embedding used by the async trait method
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let (bucket, sign) = self.bucket(&token.to_lowercase());
            vector[bucket] += sign;
        }

        l2_normalize_in_place(&mut vector);
        vector
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let digest = Sha256::digest(token.as_bytes());
        let mut index = [0u8; 8];
        index.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(index) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Hashing embedding - Text length: {}", text.len());
        Ok(self.embed_sync(text))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(true)
    }
}
