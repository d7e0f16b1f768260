//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod health;
pub mod ingest;

use actix_web::web;

/// Register every route of the service
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(ingest::configure_routes)
        .configure(health::configure_routes);
}
