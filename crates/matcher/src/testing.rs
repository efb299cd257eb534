//! Test doubles for the embedding provider

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use vendormatch_common::{Result, VendorMatchError};
use vendormatch_embedding::EmbeddingProvider;

/// Looks embeddings up in a fixed table, so tests control similarities exactly
#[derive(Debug, Default)]
pub struct StaticEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Option<Vec<f32>>,
    calls: AtomicUsize,
}

impl StaticEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Vector returned for texts missing from the table
    pub fn with_fallback(mut self, vector: Vec<f32>) -> Self {
        self.fallback = Some(vector);
        self
    }

    pub fn vector(&self, text: &str) -> Option<Vec<f32>> {
        self.vectors.get(text).or(self.fallback.as_ref()).cloned()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.vector(text)
            .ok_or_else(|| VendorMatchError::embedding(format!("no test vector for {:?}", text)))
    }

    fn model_name(&self) -> &str {
        "static-test"
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Provider that is always down
#[derive(Debug, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(VendorMatchError::embedding("provider unavailable"))
    }

    fn model_name(&self) -> &str {
        "failing-test"
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(false)
    }
}
