//! JSON body extractor that runs `validator` rules before the handler.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use toolcrib_core::error::AppError;

use crate::error::ApiError;

/// A deserialized and validated JSON body.
///
/// Malformed JSON is `InvalidInput` (400); a well-formed body with missing
/// or mistyped fields, or one that fails its validation rules, is
/// `Validation` (422).
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err: JsonRejection| match err {
                JsonRejection::JsonDataError(e) => AppError::validation(e.body_text()),
                JsonRejection::MissingJsonContentType(_) => {
                    AppError::invalid_input("Missing Content-Type: application/json header")
                }
                other => AppError::invalid_input(other.body_text()),
            })?;

        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
