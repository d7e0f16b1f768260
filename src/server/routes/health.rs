//! Health check and status endpoints

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/stats", web::get().to(stats));
}

/// Health status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `healthy` while accepting items, `draining` once shutdown began
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    pub uptime_secs: u64,
}

/// Basic health check endpoint
///
/// Used by load balancers; reports `draining` with 503 once the batcher
/// stopped accepting items.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let running = state.batcher.is_running();
    let health_status = HealthStatus {
        status: Cow::Borrowed(if running { "healthy" } else { "draining" }),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime_secs: state.uptime_secs(),
    };

    if running {
        Ok(HttpResponse::Ok().json(health_status))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(health_status))
    }
}

/// Batcher counters and queue depth
pub async fn stats(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.batcher.stats()))
}
