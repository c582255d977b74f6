use axum::{http::StatusCode, middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, logs, state::AppState};

/// Request pipeline, outermost first: trace → audit → CORS → route.
/// Validation runs inside the route as the `ValidatedJson` extractor.
pub fn build_app(state: AppState) -> Router {
    // Outside CORS so preflights that CorsLayer answers itself are still recorded.
    let audit = middleware::from_fn_with_state(state.clone(), logs::audit_requests);

    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .route("/health", get(|| async { "ok" })),
        )
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(audit)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
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
