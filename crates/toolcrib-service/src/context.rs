//! Request context carrying the acting user and the request time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolcrib_core::traits::Clock;
use toolcrib_core::types::UserId;

/// Context for the current request.
///
/// Built at the edge (HTTP extractor, CLI command) and passed into every
/// service method, so services never read a global clock or identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The admin user performing the operation, when known.
    pub actor_id: Option<UserId>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context stamped with the current time of `clock`.
    pub fn new(actor_id: Option<UserId>, clock: &dyn Clock) -> Self {
        Self {
            actor_id,
            request_time: clock.now(),
        }
    }

    /// Context for background and CLI work with no acting user.
    pub fn system(clock: &dyn Clock) -> Self {
        Self::new(None, clock)
    }
}
