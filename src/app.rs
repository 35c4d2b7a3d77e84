use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::config::AppConfig;
use crate::state::AppState;
use crate::users;

pub fn build_app(state: AppState) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let app = Router::new()
        .merge(users::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state);

    let app = if cors_enabled {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                tracing::info_span!(
                    "http_request",
                    %method,
                    uri = %uri,
                    status = tracing::field::Empty
                )
            })
            .on_response(
                |res: &axum::http::Response<_>,
                 _latency: std::time::Duration,
                 span: &tracing::Span| {
                    let status = res.status();
                    span.record("status", tracing::field::display(status));
                    if status.is_server_error() {
                        tracing::error!(%status, "response");
                    } else {
                        tracing::info!(%status, "response");
                    }
                },
            ),
    )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{header, Method, Request, StatusCode}};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn preflight() -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/users")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = build_app(AppState::in_memory())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cors_headers_when_enabled() {
        let response = build_app(AppState::in_memory())
            .oneshot(preflight())
            .await
            .unwrap();
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn no_cors_headers_when_disabled() {
        let base = AppState::in_memory();
        let config = AppConfig {
            cors_enabled: false,
            ..AppConfig::in_memory()
        };
        let state = AppState::from_parts(base.users, Arc::new(config));

        let response = build_app(state).oneshot(preflight()).await.unwrap();
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
