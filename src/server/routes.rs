// Outer routing: pages, the dedicated random-number route and the /api catch-all

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use super::{
    bridge::{BridgeAdapter, HostBridge},
    views,
};
use crate::backend::ApplicationHost;
use crate::engine::random::{RandomRange, RandomValueProvider};
use crate::Result;

/// Path matcher used by the exclusion list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePattern {
    /// Matches the path exactly, ignoring one trailing slash
    Exact(&'static str),
    /// Matches the path itself and anything below it (segment boundary)
    Prefix(&'static str),
}

impl RoutePattern {
    pub fn matches(&self, path: &str) -> bool {
        let path = normalize(path);
        match self {
            RoutePattern::Exact(pattern) => path == normalize(pattern),
            RoutePattern::Prefix(prefix) => {
                let prefix = normalize(prefix);
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .map_or(false, |rest| rest.starts_with('/') || prefix.ends_with('/'))
            }
        }
    }
}

fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Handlers the outer host answers itself, never touching the application host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalRoute {
    RandomNumber,
}

/// Paths under `/api` that bypass the application host
pub const EXCLUDED_PATHS: &[(RoutePattern, LocalRoute)] = &[(
    RoutePattern::Exact("/api/randomNumber"),
    LocalRoute::RandomNumber,
)];

/// Ordered exclusion list, consulted before any request is bridged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionList {
    entries: Vec<(RoutePattern, LocalRoute)>,
}

impl ExclusionList {
    pub fn new(entries: Vec<(RoutePattern, LocalRoute)>) -> Self {
        Self { entries }
    }

    /// First matching entry wins
    pub fn resolve(&self, path: &str) -> Option<LocalRoute> {
        self.entries
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, route)| *route)
    }

    pub fn entries(&self) -> &[(RoutePattern, LocalRoute)] {
        &self.entries
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::new(EXCLUDED_PATHS.to_vec())
    }
}

/// Shared state of the outer router
#[derive(Clone)]
pub struct OuterState {
    pub host: Arc<ApplicationHost>,
    pub bridge: Arc<dyn BridgeAdapter>,
    pub exclusions: Arc<ExclusionList>,
    pub dedicated: Arc<RandomValueProvider>,
}

impl OuterState {
    /// State that bridges into `host` and serves the dedicated route from `dedicated_range`
    pub fn new(host: Arc<ApplicationHost>, dedicated_range: RandomRange) -> Result<Self> {
        Ok(Self {
            bridge: Arc::new(HostBridge::new(host.clone())),
            host,
            exclusions: Arc::new(ExclusionList::default()),
            dedicated: Arc::new(RandomValueProvider::new(dedicated_range)?),
        })
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionList) -> Self {
        self.exclusions = Arc::new(exclusions);
        self
    }
}

/// Create the outer router
pub fn create_router(state: OuterState) -> Router {
    Router::new()
        .route("/", get(views::index_page))
        .route("/gssp", get(views::gssp_page))
        .route("/health", get(health_check))
        .route("/api", any(api_entry))
        .route("/api/*path", any(api_entry))
        .fallback(page_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// Catch-all for /api: exclusions first, then the bridge
async fn api_entry(State(state): State<OuterState>, request: Request<Body>) -> Response {
    if let Some(route) = state.exclusions.resolve(request.uri().path()) {
        return serve_local(&state, route);
    }

    match state.bridge.forward(request).await {
        Ok(response) => response,
        Err(e) => {
            error!("Bridged request failed: {}", e);
            e.into_response()
        }
    }
}

fn serve_local(state: &OuterState, route: LocalRoute) -> Response {
    match route {
        LocalRoute::RandomNumber => {
            let value = state.dedicated.generate();
            debug!("Dedicated random number route answered {}", value);
            (StatusCode::OK, value.to_string()).into_response()
        }
    }
}

async fn health_check(State(state): State<OuterState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        format!("Route Bridge is running! backend: {}", state.host.status()),
    )
}

async fn page_not_found(uri: Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, format!("404: {} could not be found", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pattern() {
        let pattern = RoutePattern::Exact("/api/randomNumber");
        assert!(pattern.matches("/api/randomNumber"));
        assert!(pattern.matches("/api/randomNumber/"));
        assert!(!pattern.matches("/api/randomNumber/hello"));
        assert!(!pattern.matches("/api/randomNumbers"));
        assert!(!pattern.matches("/api"));
    }

    #[test]
    fn test_prefix_pattern_respects_segments() {
        let pattern = RoutePattern::Prefix("/api/static");
        assert!(pattern.matches("/api/static"));
        assert!(pattern.matches("/api/static/app.js"));
        assert!(!pattern.matches("/api/staticky"));

        let root = RoutePattern::Prefix("/");
        assert!(root.matches("/anything"));
    }

    #[test]
    fn test_default_exclusions_only_cover_dedicated_route() {
        let exclusions = ExclusionList::default();
        assert_eq!(exclusions.resolve("/api/randomNumber"), Some(LocalRoute::RandomNumber));
        assert_eq!(exclusions.resolve("/api/randomNumber/hello"), None);
        assert_eq!(exclusions.resolve("/api/graphql"), None);
        assert_eq!(exclusions.entries().len(), EXCLUDED_PATHS.len());
    }

    #[test]
    fn test_first_match_wins() {
        let exclusions = ExclusionList::new(vec![
            (RoutePattern::Prefix("/api"), LocalRoute::RandomNumber),
            (RoutePattern::Exact("/api/graphql"), LocalRoute::RandomNumber),
        ]);
        assert_eq!(exclusions.resolve("/api/graphql"), Some(LocalRoute::RandomNumber));
        assert_eq!(ExclusionList::new(vec![]).resolve("/api/randomNumber"), None);
    }
}
