use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use std::time::Duration;
use vendormatch_common::VendorMatchError;
use vendormatch_matcher::{QualificationRequest, QualificationResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// Rank vendors for a category and a list of capabilities
///
/// Responds with `{"top_vendors": [...]}`, or `{"message": ...}` when no
/// vendor clears the threshold.
#[post("/vendor_qualification")]
pub async fn vendor_qualification(
    req: web::Json<QualificationRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let request = req.into_inner();
    let timeout_secs = state.config.request_timeout_secs;

    let outcome = tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        state.engine.qualify(&request),
    )
    .await
    .map_err(|_| {
        VendorMatchError::timeout(format!("vendor qualification exceeded {}s", timeout_secs))
    })??;

    Ok(HttpResponse::Ok().json(QualificationResponse::from(outcome)))
}
