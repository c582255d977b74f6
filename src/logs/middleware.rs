use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::state::AppState;

/// Records `"<METHOD> <PATH>"` for every request before it reaches routing.
///
/// Use with `axum::middleware::from_fn_with_state` outside CORS, so preflights,
/// 404/405 responses and rejected bodies are audited too. A failed insert is
/// logged and the request proceeds as if nothing happened.
pub async fn audit_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let path = request.uri().path().to_owned();

    if let Err(e) = state.audit.record(&method, &path).await {
        warn!(error = %e, %method, %path, "audit log insert failed; continuing");
    }

    next.run(request).await
}
