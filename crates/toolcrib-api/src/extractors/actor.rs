//! `Actor` extractor: builds the request context from the `x-actor-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use toolcrib_core::error::AppError;
use toolcrib_core::types::UserId;
use toolcrib_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the id of the admin user operating the client.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Request context available in handlers.
///
/// The actor is optional: scanner terminals may operate anonymously, in
/// which case `checked_out_by` / `returned_by` stay empty.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub RequestContext);

impl std::ops::Deref for Actor {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let actor_id = match parts.headers.get(ACTOR_HEADER) {
            None => None,
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| AppError::invalid_input("invalid x-actor-id header"))?;
                let id = raw
                    .parse::<UserId>()
                    .map_err(|_| AppError::invalid_input("invalid x-actor-id header"))?;
                Some(id)
            }
        };

        Ok(Actor(RequestContext::new(actor_id, state.clock.as_ref())))
    }
}
