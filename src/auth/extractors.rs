use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    auth::validation::{FieldError, Validate},
    error::ApiError,
};

/// JSON body that has been sanitized and checked against its [`Validate`] rules.
///
/// Rejection happens before the handler runs, so a bad body never reaches the store.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            warn!(error = %rejection.body_text(), "request body rejected");
            ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
        })?;

        value.sanitize();
        if let Err(errors) = value.validate() {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            warn!(?fields, "validation failed");
            return Err(ApiError::Validation(errors));
        }

        debug!("payload validated");
        Ok(ValidatedJson(value))
    }
}
