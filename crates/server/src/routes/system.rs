use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::{CatalogStatsResponse, HealthResponse};

/// Liveness and catalog size
#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    let engine = &state.engine;

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        vendors: engine.catalog().len(),
        embedding_model: engine.provider().model_name().to_string(),
    }))
}

/// Catalog build statistics and scoring parameters
#[get("/catalog/stats")]
pub async fn catalog_stats(state: web::Data<Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    let engine = &state.engine;

    Ok(HttpResponse::Ok().json(CatalogStatsResponse {
        stats: engine.catalog().stats().clone(),
        params: engine.params().clone(),
    }))
}
