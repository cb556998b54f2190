// Bridge Adapter: forwards outer requests into the inner application

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{boxed, Body, Full},
    http::Request,
    response::Response,
};
use tower::ServiceExt;
use tracing::{debug, error};

use crate::backend::ApplicationHost;
use crate::{BridgeError, Result};

/// Hands an outer request to an inner request handler
///
/// `forward` returns only after the inner handler has produced its whole
/// response, so the outer side never sees a half-written exchange.
#[async_trait]
pub trait BridgeAdapter: Send + Sync {
    async fn forward(&self, request: Request<Body>) -> Result<Response>;
}

/// Adapter backed by an [`ApplicationHost`]
#[derive(Debug, Clone)]
pub struct HostBridge {
    host: Arc<ApplicationHost>,
}

impl HostBridge {
    pub fn new(host: Arc<ApplicationHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl BridgeAdapter for HostBridge {
    async fn forward(&self, request: Request<Body>) -> Result<Response> {
        let backend = self.host.get_app().await?;
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        debug!("Forwarding {} {} to backend {}", method, path, backend.instance_id());

        // Dispatch on its own task so a panicking handler surfaces as a JoinError
        let router = backend.router();
        let response = tokio::spawn(async move { router.oneshot(request).await })
            .await
            .map_err(|e| {
                error!("Handler for {} {} failed: {}", method, path, e);
                BridgeError::Handler(format!("{} {}: {}", method, path, e))
            })?
            .unwrap_or_else(|never| match never {});

        let (parts, body) = response.into_parts();
        let bytes = hyper::body::to_bytes(body)
            .await
            .map_err(|e| BridgeError::ResponseStream(format!("{} {}: {}", method, path, e)))?;

        debug!("{} {} finished with {} ({} bytes)", method, path, parts.status, bytes.len());
        Ok(Response::from_parts(parts, boxed(Full::from(bytes))))
    }
}
