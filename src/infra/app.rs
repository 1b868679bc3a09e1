use axum::{Router, http, middleware};
use http::header::CONTENT_TYPE;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

use crate::adapters::{
    self,
    http::{app_state::AppState, middleware::rate_limit_middleware},
};

pub fn create_app(app_state: AppState) -> Router {
    let config = app_state.config.clone();

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::REFERRER_POLICY,
            http::HeaderValue::from_static("no-referrer"),
        ));

    // Per-request lines are only emitted outside production.
    let request_log_level = if config.deployment_mode.is_production() {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let api = adapters::http::routes::api_router().layer(middleware::from_fn_with_state(
        app_state.clone(),
        rate_limit_middleware,
    ));

    let static_files = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    Router::new()
        .merge(adapters::http::routes::health::router())
        .nest("/api", api)
        .fallback_service(static_files)
        .with_state(app_state)
        .layer(RequestBodyLimitLayer::new(config.request_body_limit))
        .layer(cors)
        .layer(security_headers)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &http::Request<_>| {
                    let request_id = Uuid::new_v4();
                    tracing::info_span!(
                        "http-request",
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                        request_id = %request_id
                    )
                })
                .on_request(DefaultOnRequest::new().level(request_log_level))
                .on_response(DefaultOnResponse::new().level(request_log_level)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::test_utils::TestAppStateBuilder;

    #[tokio::test]
    async fn health_is_served_at_root() {
        let app_state = TestAppStateBuilder::new().build();
        let server = TestServer::new(create_app(app_state)).unwrap();

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn api_routes_are_nested() {
        let app_state = TestAppStateBuilder::new().build();
        let server = TestServer::new(create_app(app_state)).unwrap();

        let response = server.get("/api/count").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn security_headers_are_set() {
        let app_state = TestAppStateBuilder::new().build();
        let server = TestServer::new(create_app(app_state)).unwrap();

        let response = server.get("/health").await;

        let headers = response.headers();
        assert_eq!(headers[http::header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[http::header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[http::header::REFERRER_POLICY], "no-referrer");
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_index_html() {
        let app_state = TestAppStateBuilder::new().build();
        let server = TestServer::new(create_app(app_state)).unwrap();

        let response = server.get("/some/client/route").await;

        response.assert_status_ok();
        assert!(response.text().contains("<html"));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_413() {
        let app_state = TestAppStateBuilder::new().build();
        let server = TestServer::new(create_app(app_state)).unwrap();

        let name = "a".repeat(20 * 1024);
        let response = server
            .post("/api/signup")
            .json(&serde_json::json!({ "name": name, "email": "ana@example.com", "phone": "555" }))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = response.json();
        assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(body["error"], "Request body too large");
    }

    #[tokio::test]
    async fn rate_limit_applies_to_api_routes() {
        let app_state = TestAppStateBuilder::new().with_rate_limit(2).build();
        let server = TestServer::new(create_app(app_state)).unwrap();

        server.get("/api/count").await.assert_status_ok();
        server.get("/api/count").await.assert_status_ok();
        let response = server.get("/api/count").await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        let body: Value = response.json();
        assert_eq!(body["code"], "RATE_LIMITED");

        // Health checks are not rate limited.
        server.get("/health").await.assert_status_ok();
    }
}
