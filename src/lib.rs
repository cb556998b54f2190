// Route Bridge - Rust Edition
// A small demo service that mounts an inner API application behind an outer page host

//! # Route Bridge Library
//!
//! This is the library root for Route Bridge. An **outer host** serves pages and
//! a dedicated random-number route, and forwards everything else under `/api`
//! into an **inner application** that is built lazily, exactly once per process.
//!
//! ## Core Components
//!
//! ### Leaf handlers
//! - [`RandomValueProvider`]: produces a pseudo-random number within a configured range
//! - [`echo`]: wraps a path parameter in an [`EchoParam`] record
//! - [`list_books`] / [`CatalogSchema`]: the fixed three-book catalog, exposed over GraphQL
//!
//! ### Application Host
//! [`ApplicationHost`] owns the inner [`Backend`]. It moves through
//! `Uninitialized -> Initializing -> Ready`, and every caller that arrives while
//! construction is in flight awaits the same shared construction future.
//!
//! ### Outer host
//! - [`HostBridge`]: the [`BridgeAdapter`] that forwards a request into the inner router
//!   and only returns once the inner response body has been fully produced
//! - [`ExclusionList`]: paths under `/api` that the outer host answers itself
//! - [`BridgeServerBuilder`]: configures and runs the whole thing
//!
//! ```text
//! request ──► outer router ──► excluded path? ──yes──► dedicated random route
//!                                   │ no
//!                                   ▼
//!                              HostBridge ──► ApplicationHost::get_app() ──► inner router
//! ```

// Core domain models
pub mod models;

// Leaf handlers and the GraphQL catalog
pub mod engine;

// Inner application and its lazy host
pub mod backend;

// Outer host: routes, bridge adapter, views
pub mod server;

// Re-export core types for easy access
pub use models::{catalog, list_books, Book};

pub use engine::{
    echo::{echo, EchoParam},
    graphql::{create_schema, CatalogSchema, Query},
    random::{RandomRange, RandomValueProvider},
};

pub use backend::{
    app::{AppController, Backend, BackendConfig, GLOBAL_PREFIX},
    get_app, global_host,
    host::{ApplicationHost, BackendFactory, HostStatus},
};

pub use server::{
    bridge::{BridgeAdapter, HostBridge},
    routes::{create_router, ExclusionList, LocalRoute, OuterState, RoutePattern, EXCLUDED_PATHS},
    BridgeServer, BridgeServerBuilder, ServerConfig,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error types for Route Bridge operations
///
/// The enum is `Clone` because a single failed host construction is handed
/// to every caller that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// The inner application could not be built
    #[error("Application host construction failed: {0}")]
    Construction(String),

    /// An inner handler failed while dispatching a request
    #[error("Handler failed: {0}")]
    Handler(String),

    /// The inner response body errored before it was fully written
    #[error("Response stream aborted: {0}")]
    ResponseStream(String),

    /// A configuration value was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BridgeError {
    /// Short machine-readable name used in the JSON error envelope
    pub fn error_type(&self) -> &'static str {
        match self {
            BridgeError::Construction(_) => "construction_error",
            BridgeError::Handler(_) => "handler_error",
            BridgeError::ResponseStream(_) => "response_stream_error",
            BridgeError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Error envelope returned to HTTP clients
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                message: self.to_string(),
                error_type: self.error_type().to_string(),
            },
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Type alias for Results that use our custom error type
pub type Result<T> = std::result::Result<T, BridgeError>;
