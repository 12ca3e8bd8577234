// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, response headers, and router
//! construction.
//!
//! This module is `pub` so that integration tests can build a test router
//! directly without starting the full binary.

use crate::models::search::{ErrorResponse, SearchItem, SearchParams};
use crate::models::version::VersionResponse;
use crate::services::fetcher::CorpusClient;
use crate::services::index::SearchIndex;
use crate::services::search::run_query;
use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `DOCSEARCH_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("DOCSEARCH_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Client for the upstream corpus endpoint. The corpus itself is fetched
    /// anew on every search request.
    pub corpus_client: Arc<CorpusClient>,
    /// Configured `Access-Control-Allow-Origin` value.
    pub cross_origin: HeaderValue,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn internal_error(message: &str) -> ErrorReply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// Search the corpus and group matches under their parent pages.
///
/// The pipeline is strictly linear per request: fetch the corpus, build the
/// in-memory index, run the query, group, respond. No state survives the
/// request.
#[utoipa::path(
    get,
    path = "/",
    params(SearchParams),
    responses(
        (status = 200, description = "Grouped search results (empty for an empty query)", body = [SearchItem]),
        (status = 500, description = "Upstream corpus fetch or search failure", body = ErrorResponse),
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchItem>>, ErrorReply> {
    let pages = state.corpus_client.fetch().await.map_err(|e| {
        tracing::error!(error = %e, "corpus fetch failed");
        internal_error("Failed to fetch indexes")
    })?;

    let index = SearchIndex::build(&pages).map_err(|e| {
        tracing::error!(error = %e, "index build failed");
        internal_error("Failed to build search index")
    })?;

    let query = params.query.as_deref().unwrap_or("");
    let items = run_query(&index, query, params.tag.as_deref()).map_err(|e| {
        tracing::error!(error = %e, "search failed");
        internal_error("Search failed")
    })?;

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Agent name and version", body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "docsearch-agent".to_string(),
        version: VERSION.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Response headers
// ---------------------------------------------------------------------------

/// Attach the fixed security/CORS header set to every response, success and
/// failure alike.
async fn security_headers(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("on"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        state.cross_origin.clone(),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(paths(search_handler, version_handler))]
pub struct ApiDoc;

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_handler))
        .route("/version", get(version_handler))
        .with_state(state.clone())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state, security_headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app(api_url: &str) -> Router {
        let state = AppState {
            corpus_client: Arc::new(CorpusClient::new(api_url.to_string())),
            cross_origin: HeaderValue::from_static("https://docs.example.com"),
        };
        create_router(state)
    }

    /// App pointed at a port nothing listens on; only useful for routes that
    /// never reach the upstream, and for the fetch-failure path itself.
    async fn unreachable_upstream_app() -> Router {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        test_app(&format!("http://{}/indexes.json", addr))
    }

    #[tokio::test]
    async fn test_version_endpoint_response() {
        let app = unreachable_upstream_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/version")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let version_response: VersionResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(version_response.agent, "docsearch-agent");
        assert_eq!(version_response.version, VERSION);
    }

    #[tokio::test]
    async fn test_version_follows_semver_format() {
        let app = unreachable_upstream_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/version")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let version_response: VersionResponse = serde_json::from_slice(&body).unwrap();

        let parts: Vec<&str> = version_response.version.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].parse::<u32>().is_ok());
        assert!(parts[1].parse::<u32>().is_ok());
        assert!(parts[2].parse::<u32>().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_route_returns_404() {
        let app = unreachable_upstream_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/invalid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_returns_fetch_error_body() {
        let app = unreachable_upstream_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/?query=welcome")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "Failed to fetch indexes");
    }

    #[tokio::test]
    async fn test_error_responses_carry_the_fixed_header_set() {
        let app = unreachable_upstream_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/?query=welcome")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "https://docs.example.com"
        );
        assert_eq!(headers.get("vary").unwrap(), "Origin");
    }

    #[tokio::test]
    async fn test_concurrent_requests_succeed() {
        let app = unreachable_upstream_app().await;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let app_clone = app.clone();
                tokio::spawn(async move {
                    let response = app_clone
                        .oneshot(
                            Request::builder()
                                .uri("/version")
                                .body(Body::empty())
                                .unwrap(),
                        )
                        .await
                        .unwrap();
                    response.status()
                })
            })
            .collect();

        for handle in handles {
            let status = handle.await.unwrap();
            assert_eq!(status, StatusCode::OK);
        }
    }
}
