use futures::future::try_join_all;
use tracing::debug;
use vendormatch_common::Result;
use vendormatch_embedding::EmbeddingProvider;

use crate::types::QualificationRequest;

/// One capability, contextualized with the category and embedded
#[derive(Debug, Clone)]
pub struct CapabilityQuery {
    pub capability: String,
    pub query: String,
    pub embedding: Vec<f32>,
}

/// Embedded queries for one request
#[derive(Debug, Clone)]
pub struct QuerySet {
    /// Same order as the request's capabilities
    pub capability_queries: Vec<CapabilityQuery>,
    pub category_embedding: Vec<f32>,
}

/// "{capability} in {category}"
pub fn enrich_capability(capability: &str, software_category: &str) -> String {
    format!("{} in {}", capability, software_category)
}

/// Validate the request and embed its capability and category queries
pub async fn build_queries(
    provider: &dyn EmbeddingProvider,
    request: &QualificationRequest,
) -> Result<QuerySet> {
    request.validate()?;

    let queries: Vec<String> = request
        .capabilities
        .iter()
        .map(|c| enrich_capability(c, &request.software_category))
        .collect();

    debug!("Embedding {} capability queries: {:?}", queries.len(), queries);

    let (embeddings, category_embedding) = futures::try_join!(
        try_join_all(queries.iter().map(|q| provider.embed(q))),
        provider.embed(&request.software_category),
    )?;

    let capability_queries = request
        .capabilities
        .iter()
        .zip(queries)
        .zip(embeddings)
        .map(|((capability, query), embedding)| CapabilityQuery {
            capability: capability.clone(),
            query,
            embedding,
        })
        .collect();

    Ok(QuerySet {
        capability_queries,
        category_embedding,
    })
}
