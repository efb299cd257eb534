use tracing::{debug, trace};
use vendormatch_embedding::EmbeddingProvider;

use crate::query::QuerySet;
use crate::types::{
    FeaturePooling, MatchParams, QualificationResult, QualifiedVendor, VendorCatalog,
};

/// Score breakdown for one vendor
#[derive(Debug, Clone, PartialEq)]
pub struct VendorScore {
    /// Pooled similarity per capability query, in query order
    pub capability_scores: Vec<f64>,
    /// Mean of `capability_scores`
    pub capability_score: f64,
    pub category_score: f64,
    /// Weighted combination, rounded to 4 decimals
    pub combined_score: f64,
}

/// Round to 4 decimal places
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Similarity of `query` to a vendor's features, pooled across features
fn pooled_similarity(
    provider: &dyn EmbeddingProvider,
    query: &[f32],
    vendor: &QualifiedVendor,
    pooling: FeaturePooling,
) -> f64 {
    let similarities = vendor
        .feature_embeddings()
        .iter()
        .map(|feature| provider.similarity(query, feature) as f64);

    match pooling {
        FeaturePooling::Max => similarities.fold(f64::NEG_INFINITY, f64::max),
        FeaturePooling::Mean => {
            let count = vendor.feature_embeddings().len() as f64;
            similarities.sum::<f64>() / count
        }
    }
}

/// Score one vendor against the request queries
pub fn score_vendor(
    provider: &dyn EmbeddingProvider,
    vendor: &QualifiedVendor,
    queries: &QuerySet,
    params: &MatchParams,
) -> VendorScore {
    let capability_scores: Vec<f64> = queries
        .capability_queries
        .iter()
        .map(|q| pooled_similarity(provider, &q.embedding, vendor, params.feature_pooling))
        .collect();

    let capability_score = if capability_scores.is_empty() {
        0.0
    } else {
        capability_scores.iter().sum::<f64>() / capability_scores.len() as f64
    };

    let category_score = pooled_similarity(
        provider,
        &queries.category_embedding,
        vendor,
        params.feature_pooling,
    );

    let combined_score = round4(
        capability_score * params.capability_weight + category_score * params.category_weight,
    );

    VendorScore {
        capability_scores,
        capability_score,
        category_score,
        combined_score,
    }
}

/// Rank catalog vendors for one request
///
/// Vendors scoring below the threshold are dropped. The rest are ordered by
/// score, then rating, both descending; full ties keep catalog order. At most
/// `top_k` results are returned.
pub fn rank(
    provider: &dyn EmbeddingProvider,
    catalog: &VendorCatalog,
    queries: &QuerySet,
    params: &MatchParams,
) -> Vec<QualificationResult> {
    let mut results: Vec<QualificationResult> = catalog
        .vendors()
        .iter()
        .filter_map(|vendor| {
            let score = score_vendor(provider, vendor, queries, params);
            let profile = vendor.profile();
            trace!(
                vendor = %profile.product_name,
                capability_scores = ?score.capability_scores,
                category_score = score.category_score,
                combined_score = score.combined_score,
                "Scored vendor"
            );

            (score.combined_score >= params.threshold).then(|| QualificationResult {
                product_name: profile.product_name.clone(),
                average_similarity: score.combined_score,
                rating: profile.rating,
                category: profile.main_category.clone(),
                product_url: profile.product_url.clone(),
                seller: profile.seller.clone(),
                full_pricing_page: profile.full_pricing_page.clone(),
            })
        })
        .collect();

    let above_threshold = results.len();

    // stable sort: equal (score, rating) keep catalog order
    results.sort_by(|a, b| {
        b.average_similarity
            .total_cmp(&a.average_similarity)
            .then_with(|| b.rating.total_cmp(&a.rating))
    });
    results.truncate(params.top_k);

    debug!(
        "Ranked {} vendors - {} above threshold {}, returning {}",
        catalog.len(),
        above_threshold,
        params.threshold,
        results.len()
    );

    results
}
