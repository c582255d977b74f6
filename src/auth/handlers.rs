use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, MessageResponse, SignupRequest},
        extractors::ValidatedJson,
        services,
    },
    error::ApiError,
    state::AppState,
};

pub const MSG_USER_CREATED: &str = "User created successfully";
pub const MSG_LOGIN_OK: &str = "Login successful";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    services::register_user(state.users.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: MSG_USER_CREATED,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::authenticate(state.users.as_ref(), payload).await?;
    Ok(Json(MessageResponse {
        message: MSG_LOGIN_OK,
    }))
}
