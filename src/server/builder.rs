//! Server builder and run_server function

use crate::batching::BatchSink;
use crate::config::Config;
use crate::server::server::HttpServer;
use crate::server::state::Item;
use crate::utils::error::{Result, ServiceError};
use std::sync::Arc;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    sink: Option<Arc<dyn BatchSink<Item>>>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Deliver batches to `sink` instead of the logging sink
    pub fn with_sink(mut self, sink: Arc<dyn BatchSink<Item>>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| ServiceError::Config("Configuration is required".to_string()))?;

        match self.sink {
            Some(sink) => HttpServer::with_sink(&config, sink).await,
            None => HttpServer::new(&config).await,
        }
    }
}

/// Run the server with an already loaded configuration
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting ingestd {}", crate::VERSION);

    let server = ServerBuilder::new().with_config(config).build().await?;
    let batching = server.state().config.batching();
    info!(
        "Server starting at: http://{}",
        server.config().address()
    );
    info!(
        queue_capacity = batching.queue_capacity,
        max_batch_size = batching.max_batch_size,
        linger_ms = batching.linger_ms,
        "Batching enabled"
    );
    info!("API Endpoints:");
    info!("   POST /process - Queue one number for batching");
    info!("   GET  /health  - Health check");
    info!("   GET  /stats   - Batcher counters");

    server.start().await
}
