//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::batching::{BatchSink, Batcher, LoggingSink};
use crate::config::{Config, ServerConfig};
use crate::server::routes;
use crate::server::state::{AppState, Item};
use crate::utils::error::{Result, ServiceError};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server backed by the logging sink
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_sink(config, Arc::new(LoggingSink::new())).await
    }

    /// Create a new HTTP server delivering batches to `sink`
    pub async fn with_sink(config: &Config, sink: Arc<dyn BatchSink<Item>>) -> Result<Self> {
        info!("Creating HTTP server");

        let batcher = Batcher::start(config.batching(), config.delivery(), sink)?;
        let state = AppState::new(config.clone(), batcher);

        Ok(Self {
            config: config.server().clone(),
            state,
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let json_config = web::JsonConfig::default()
            .limit(state.config.server().max_body_size)
            .error_handler(|err, _req| {
                warn!(error = %err, "Rejected malformed request body");
                ServiceError::bad_request(err.to_string()).into()
            });

        App::new()
            .app_data(state)
            .app_data(json_config)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "ingestd")))
            .configure(routes::configure_routes)
    }

    /// Start the HTTP server, then stop the batcher once the server exits
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;

        info!("Starting HTTP server on {}", bind_addr);

        let batcher = self.state.batcher.clone();
        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(self.config.worker_count())
            .shutdown_timeout(self.config.shutdown_timeout)
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        let served = server
            .await
            .map_err(|e| ServiceError::server(format!("Server error: {}", e)));

        info!("HTTP server stopped, draining batcher");
        if let Err(e) = batcher.shutdown().await {
            error!(error = %e, "Batcher did not shut down cleanly");
        }

        served
    }

    fn format_bind_error(e: std::io::Error, addr: &str, port: u16) -> ServiceError {
        match e.kind() {
            std::io::ErrorKind::AddrInUse => ServiceError::server(format!(
                "Port {} is already in use, set INGEST_PORT or server.port to another value",
                port
            )),
            std::io::ErrorKind::PermissionDenied => ServiceError::server(format!(
                "Permission denied binding {}, ports below 1024 need elevated privileges",
                addr
            )),
            _ => ServiceError::server(format!("Failed to bind {}: {}", addr, e)),
        }
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
