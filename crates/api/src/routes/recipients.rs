//! Route definitions for the `/recipients` resource.
//!
//! Ticket-scoped recipient routes (listing, enrollment) live under
//! `/tickets/{id}/recipients`; the transition routes here act on a
//! recipient row directly.

use axum::routing::post;
use axum::Router;

use crate::handlers::recipients;
use crate::state::AppState;

/// Routes mounted at `/recipients`.
///
/// ```text
/// POST /{id}/review  -> mark_in_review
/// POST /{id}/reject  -> mark_rejected
/// POST /{id}/offer   -> submit_offer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/review", post(recipients::mark_in_review))
        .route("/{id}/reject", post(recipients::mark_rejected))
        .route("/{id}/offer", post(recipients::submit_offer))
}
