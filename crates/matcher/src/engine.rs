use std::sync::Arc;
use tracing::info;
use vendormatch_common::{AppConfig, Result, VendorMatchError};
use vendormatch_embedding::{provider_from_config, EmbeddingProvider};

use crate::catalog::build_catalog;
use crate::dataset::{load_records, VendorRecord};
use crate::query::build_queries;
use crate::ranker::rank;
use crate::types::{MatchParams, QualificationOutcome, QualificationRequest, VendorCatalog};

/// Vendor matching context
///
/// Owns the embedding provider, the catalog built with it, and the scoring
/// parameters. Constructed once before serving; read-only afterwards, so it
/// can be shared across request handlers behind an `Arc`.
pub struct MatchEngine {
    provider: Arc<dyn EmbeddingProvider>,
    catalog: Arc<VendorCatalog>,
    params: MatchParams,
}

impl MatchEngine {
    /// Wrap an already built catalog
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        catalog: VendorCatalog,
        params: MatchParams,
    ) -> Self {
        Self {
            provider,
            catalog: Arc::new(catalog),
            params,
        }
    }

    /// Build the catalog from dataset rows, embedding with `provider`
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        records: &[VendorRecord],
        params: MatchParams,
        concurrency: usize,
    ) -> Result<Self> {
        let catalog = build_catalog(provider.as_ref(), records, concurrency).await?;
        Ok(Self::new(provider, catalog, params))
    }

    /// Load the configured dataset and build everything from configuration
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let params = MatchParams::from_config(config)?;
        let provider = provider_from_config(config)?;
        let records = load_records(&config.dataset_path)?;

        info!(
            "Match parameters: threshold={}, weights={}/{}, top_k={}, pooling={:?}",
            params.threshold,
            params.capability_weight,
            params.category_weight,
            params.top_k,
            params.feature_pooling
        );

        Self::build(provider, &records, params, config.embed_concurrency).await
    }

    /// Rank vendors for one request
    pub async fn qualify(&self, request: &QualificationRequest) -> Result<QualificationOutcome> {
        info!(
            "Qualifying vendors - category: {:?}, {} capabilities",
            request.software_category,
            request.capabilities.len()
        );

        let queries = build_queries(self.provider.as_ref(), request).await?;

        // CPU bound scan runs on the blocking pool, outside the caller's poll
        let provider = Arc::clone(&self.provider);
        let catalog = Arc::clone(&self.catalog);
        let params = self.params.clone();
        let results = tokio::task::spawn_blocking(move || {
            rank(provider.as_ref(), &catalog, &queries, &params)
        })
        .await
        .map_err(|e| VendorMatchError::internal(format!("Vendor scan failed: {}", e)))?;

        info!("Qualification completed - {} vendors returned", results.len());
        Ok(results.into())
    }

    pub fn catalog(&self) -> &VendorCatalog {
        &self.catalog
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }
}
