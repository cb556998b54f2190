// Inner application for Route Bridge
// Aggregates the leaf handlers and the catalog schema behind the `/api` prefix

use std::sync::{Arc, Mutex, PoisonError};

use async_graphql::http::{parse_query_string, GraphiQLSource};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{OriginalUri, Path, RawQuery, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::{
    echo::{echo, EchoParam},
    graphql::{create_schema, CatalogSchema},
    random::{RandomRange, RandomValueProvider},
};
use crate::Result;

/// Prefix every inner route is mounted under
pub const GLOBAL_PREFIX: &str = "/api";

/// Inner application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub controller_range: RandomRange,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            controller_range: RandomRange::CONTROLLER,
        }
    }
}

/// Request handlers owned by the inner application
///
/// Also reachable without HTTP through [`Backend::controller`], which is how the
/// server-rendered view gets its number.
#[derive(Debug, Clone)]
pub struct AppController {
    random: RandomValueProvider,
}

impl AppController {
    pub fn new(range: RandomRange) -> Result<Self> {
        Ok(Self {
            random: RandomValueProvider::new(range)?,
        })
    }

    pub fn random_number(&self) -> f64 {
        self.random.generate()
    }

    pub fn echo(&self, param: String) -> EchoParam {
        echo(param)
    }

    pub fn range(&self) -> RandomRange {
        self.random.range()
    }
}

#[derive(Clone)]
struct AppState {
    controller: Arc<AppController>,
    schema: CatalogSchema,
}

/// A fully initialised inner application
///
/// `Router` is `Send` but not `Sync`; it sits behind a mutex so an `Arc<Backend>`
/// can be shared between tasks. Callers only ever get clones of it.
pub struct Backend {
    instance_id: Uuid,
    controller: Arc<AppController>,
    schema: CatalogSchema,
    router: Mutex<Router>,
}

impl Backend {
    /// Build the controller, the schema and the prefixed router.
    ///
    /// Fails when the configuration is rejected; nothing is registered in that case.
    pub async fn create(config: BackendConfig) -> Result<Self> {
        let instance_id = Uuid::new_v4();
        debug!("Creating backend instance {}", instance_id);

        let controller = Arc::new(AppController::new(config.controller_range)?);
        let schema = create_schema();
        let router = build_router(AppState {
            controller: controller.clone(),
            schema: schema.clone(),
        });

        info!("🏗️  Backend {} initialised under prefix {}", instance_id, GLOBAL_PREFIX);
        Ok(Self {
            instance_id,
            controller,
            schema,
            router: Mutex::new(router),
        })
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn controller(&self) -> &AppController {
        &self.controller
    }

    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }

    /// The request listener. Cloning a `Router` is cheap.
    pub fn router(&self) -> Router {
        self.router
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[cfg(test)]
    pub(crate) fn with_router(mut self, router: Router) -> Self {
        self.router = Mutex::new(router);
        self
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("instance_id", &self.instance_id)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/randomNumber", get(random_number))
        .route("/randomNumber/:param", get(echo_param))
        .route("/graphql", get(graphql_get).post(graphql_post));

    Router::new()
        .nest(GLOBAL_PREFIX, api)
        .fallback(not_found)
        .with_state(state)
}

async fn random_number(State(state): State<AppState>) -> Json<f64> {
    Json(state.controller.random_number())
}

// Deserialized by name: requests bridged from the outer `/api/*path` route
// still carry that route's `path` parameter, which is ignored here.
#[derive(Debug, Deserialize)]
struct EchoPath {
    param: String,
}

async fn echo_param(State(state): State<AppState>, Path(path): Path<EchoPath>) -> Json<EchoParam> {
    Json(state.controller.echo(path.param))
}

async fn graphql_post(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

// GET with a query string executes it; a bare GET serves GraphiQL
async fn graphql_get(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Html(graphiql()).into_response();
    };

    match parse_query_string(&query) {
        Ok(request) => GraphQLResponse::from(state.schema.execute(request).await).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"statusCode": 400, "message": e.to_string(), "error": "Bad Request"})),
        )
            .into_response(),
    }
}

fn graphiql() -> String {
    GraphiQLSource::build()
        .endpoint(&format!("{}/graphql", GLOBAL_PREFIX))
        .finish()
}

async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "statusCode": 404,
            "message": format!("Cannot {} {}", method, uri.path()),
            "error": "Not Found",
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BridgeError;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    async fn json_body(response: Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get(backend: &Backend, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        backend.router().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_random_number_route_uses_controller_range() {
        let backend = Backend::create(BackendConfig::default()).await.unwrap();
        let response = get(&backend, "/api/randomNumber").await;
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await.as_f64().unwrap();
        assert!(RandomRange::CONTROLLER.contains(value));
    }

    #[tokio::test]
    async fn test_echo_route_round_trips_param() {
        let backend = Backend::create(BackendConfig::default()).await.unwrap();

        let response = get(&backend, "/api/randomNumber/hello").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"param": "hello"}));

        let response = get(&backend, "/api/randomNumber/a%20b%2Fc").await;
        assert_eq!(json_body(response).await, json!({"param": "a b/c"}));
    }

    #[tokio::test]
    async fn test_graphql_post_and_get() {
        let backend = Backend::create(BackendConfig::default()).await.unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/graphql")
            .header("content-type", "application/json")
            .body(Body::from(json!({"query": "{ books { id } }"}).to_string()))
            .unwrap();
        let response = backend.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"data": {"books": [{"id": 1}, {"id": 2}, {"id": 3}]}})
        );

        let response = get(&backend, "/api/graphql?query=%7B%20books%20%7B%20title%20%7D%20%7D").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["books"][1]["title"], "Book 2");
    }

    #[tokio::test]
    async fn test_graphql_bare_get_serves_graphiql() {
        let backend = Backend::create(BackendConfig::default()).await.unwrap();
        let response = get(&backend, "/api/graphql").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/graphql"));
    }

    #[tokio::test]
    async fn test_unknown_route_returns_not_found_envelope() {
        let backend = Backend::create(BackendConfig::default()).await.unwrap();

        let response = get(&backend, "/api/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({"statusCode": 404, "message": "Cannot GET /api/missing", "error": "Not Found"})
        );

        // Routes only exist under the prefix
        let response = get(&backend, "/randomNumber").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_range_fails_construction() {
        let config = BackendConfig {
            controller_range: RandomRange::new(1.0, 0.0),
        };
        let err = Backend::create(config).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfig(_)));
    }

    #[test]
    fn test_backend_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Backend>();
        assert_send_sync::<Arc<Backend>>();
    }

    #[tokio::test]
    async fn test_shared_backend_serves_from_spawned_tasks() {
        let backend = Arc::new(Backend::create(BackendConfig::default()).await.unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let backend = backend.clone();
                tokio::spawn(async move {
                    let request = Request::builder()
                        .uri(format!("/api/randomNumber/task{}", i))
                        .body(Body::empty())
                        .unwrap();
                    backend.router().oneshot(request).await.unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let response = handle.await.unwrap();
            assert_eq!(json_body(response).await, json!({"param": format!("task{}", i)}));
        }
    }

    #[tokio::test]
    async fn test_echo_ignores_outer_path_params() {
        // Mirrors the outer catch-all: a wildcard route whose params are still in
        // the request extensions when the inner router sees it
        let backend = Arc::new(Backend::create(BackendConfig::default()).await.unwrap());
        let outer = Router::new().route(
            "/api/*path",
            axum::routing::any(move |request: Request<Body>| {
                let backend = backend.clone();
                async move { backend.router().oneshot(request).await.unwrap() }
            }),
        );

        let request = Request::builder()
            .uri("/api/randomNumber/hello")
            .body(Body::empty())
            .unwrap();
        let response = outer.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"param": "hello"}));
    }

    #[test]
    fn test_controller_direct_invocation() {
        let controller = AppController::new(RandomRange::CONTROLLER).unwrap();
        assert!(controller.range().contains(controller.random_number()));
        assert_eq!(controller.echo(String::new()).param, "");
    }
}
