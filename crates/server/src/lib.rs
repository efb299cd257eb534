//! VendorMatch HTTP server
//!
//! Actix-web REST API over the matching engine

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use vendormatch_common::{AppConfig, Result, VendorMatchError};
use vendormatch_matcher::MatchEngine;

use crate::error::ApiError;
use crate::state::AppState;

pub use routes::configure;

/// JSON extractor config: undecodable bodies become `InvalidRequest`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::from(VendorMatchError::invalid_request(err.to_string())).into()
    })
}

/// Build the engine from configuration, then serve
pub async fn start_server(config: AppConfig) -> Result<()> {
    config.validate()?;

    info!("Loading vendor catalog from {}", config.dataset_path.display());
    let engine = MatchEngine::from_config(&config).await?;

    serve(config, engine).await
}

/// Serve an already built engine until shutdown
pub async fn serve(config: AppConfig, engine: MatchEngine) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config, engine));

    info!(
        "Starting server on {} with {} vendors",
        bind_addr,
        state.engine.catalog().len()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config())
            .configure(configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
