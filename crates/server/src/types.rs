use serde::Serialize;
use vendormatch_matcher::{CatalogStats, MatchParams};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,

    /// Vendors in the catalog
    pub vendors: usize,

    /// Embedding model serving queries
    pub embedding_model: String,
}

/// Catalog statistics response
#[derive(Debug, Serialize)]
pub struct CatalogStatsResponse {
    #[serde(flatten)]
    pub stats: CatalogStats,

    /// Scoring parameters in effect
    pub params: MatchParams,
}
