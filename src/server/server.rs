//! HTTP server core implementation

use crate::config::Config;
use crate::core::client::DirectoryClient;
use crate::error::{Result, ServiceError};
use crate::server::routes;
use crate::server::state::AppState;
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::Logger, web};
use std::sync::Arc;
use tracing::info;

/// HTTP server
pub struct HttpServer {
    bind_addr: String,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server wired to the Hospital Directory API
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating HTTP server");

        let directory = Arc::new(DirectoryClient::new(&config.directory)?);
        let bind_addr = format!("{}:{}", config.server.host, config.server.port);
        let state = AppState::new(config, directory);

        Ok(Self { bind_addr, state })
    }

    /// Start the HTTP server and run until shutdown
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.bind_addr;
        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(Cors::permissive())
                .wrap(Logger::default())
                .configure(routes::hospitals::configure_routes)
                .configure(routes::health::configure_routes)
        })
        .bind(&bind_addr)
        .map_err(|e| ServiceError::Config(format!("Failed to bind {}: {}", bind_addr, e)))?
        .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| ServiceError::Internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }
}
