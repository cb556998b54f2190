// Route Bridge outer host
// Serves the pages and the dedicated route, and bridges the rest of /api into the backend

//! # Server Module
//!
//! ```text
//! Client
//!   ↓ HTTP
//! Outer router (routes) ── exclusion list ──► dedicated random route
//!   ↓ catch-all /api/*
//! HostBridge (bridge) ──► ApplicationHost ──► Backend router
//! ```
//!
//! - [`routes`]: outer router, exclusion list, catch-all
//! - [`bridge`]: the [`BridgeAdapter`] trait and [`HostBridge`]
//! - [`views`]: the fetch-based and server-rendered pages

pub mod bridge;
pub mod routes;
pub mod views;


use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing::info;

pub use bridge::{BridgeAdapter, HostBridge};
pub use routes::{create_router, ExclusionList, LocalRoute, OuterState, RoutePattern, EXCLUDED_PATHS};

use crate::backend::{global_host, ApplicationHost, GLOBAL_PREFIX};
use crate::engine::random::RandomRange;
use crate::Result;

/// Outer server configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    pub dedicated_range: RandomRange,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_enabled: true,
            dedicated_range: RandomRange::DEDICATED,
        }
    }
}

/// Outer server
pub struct BridgeServer {
    config: ServerConfig,
    state: OuterState,
}

impl BridgeServer {
    /// Server bridging into the process-wide application host
    pub fn new(config: ServerConfig) -> Result<Self> {
        Self::with_host(config, global_host())
    }

    pub fn with_host(config: ServerConfig, host: Arc<ApplicationHost>) -> Result<Self> {
        let state = OuterState::new(host, config.dedicated_range)?;
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn create_router(&self) -> axum::Router {
        let router = create_router(self.state.clone());
        if self.config.cors_enabled {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Bind and serve until the process exits
    pub async fn run(self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = self.create_router();
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!("🚀 Route Bridge server starting");
        info!("📡 Server address: http://{}", addr);
        info!("🔗 Endpoints:");
        info!("   GET  http://{}/", addr);
        info!("   GET  http://{}/gssp", addr);
        info!("   GET  http://{}{}/randomNumber (dedicated)", addr, GLOBAL_PREFIX);
        info!("   ANY  http://{}{}/* (bridged)", addr, GLOBAL_PREFIX);
        info!("   POST http://{}{}/graphql", addr, GLOBAL_PREFIX);
        info!("📋 CORS enabled: {}", self.config.cors_enabled);

        axum::Server::bind(&addr.parse()?)
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}

/// Builder pattern for the outer server
pub struct BridgeServerBuilder {
    config: ServerConfig,
    host: Option<Arc<ApplicationHost>>,
}

impl BridgeServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            host: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn with_host(mut self, host: String) -> Self {
        self.config.host = host;
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    pub fn with_dedicated_range(mut self, range: RandomRange) -> Self {
        self.config.dedicated_range = range;
        self
    }

    /// Use a specific application host instead of the process-wide one
    pub fn with_host_handle(mut self, host: Arc<ApplicationHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn build(self) -> Result<BridgeServer> {
        match self.host {
            Some(host) => BridgeServer::with_host(self.config, host),
            None => BridgeServer::new(self.config),
        }
    }
}

impl Default for BridgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
