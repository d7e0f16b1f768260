//! Ingestion endpoint

use crate::server::state::{AppState, Item};
use crate::utils::error::ServiceError;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configure ingestion routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/process", web::post().to(process));
}

/// Request body of `POST /process`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub number: Item,
}

/// Queue one number for batching.
///
/// Answers `202 Accepted` with an empty body as soon as the item is queued;
/// batch delivery happens later on the assembler task.
pub async fn process(
    state: web::Data<AppState>,
    request: web::Json<ProcessRequest>,
) -> Result<HttpResponse, ServiceError> {
    let number = request.into_inner().number;
    debug!(number, "Submitting item");

    state.batcher.submit(number).await?;

    Ok(HttpResponse::Accepted().finish())
}
