//! Route definitions for the `/tickets` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{dispatch, recipients, tickets};
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// POST   /                        -> create_ticket (draft, no dispatch)
/// GET    /                        -> list_tickets  (?include_deleted=)
/// POST   /dispatch                -> dispatch (create-or-edit + send)
/// GET    /{id}                    -> get_ticket
/// PUT    /{id}                    -> update_ticket
/// DELETE /{id}                    -> delete_ticket (soft)
/// POST   /{id}/restore            -> restore_ticket
/// GET    /{id}/materials          -> get_materials
/// GET    /{id}/recipients         -> list_recipients (creator only)
/// POST   /{id}/recipients/ensure  -> ensure_recipient (responder)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tickets::create_ticket).get(tickets::list_tickets))
        .route("/dispatch", post(dispatch::dispatch))
        .route(
            "/{id}",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .route("/{id}/restore", post(tickets::restore_ticket))
        .route("/{id}/materials", get(tickets::get_materials))
        .route("/{id}/recipients", get(recipients::list_recipients))
        .route(
            "/{id}/recipients/ensure",
            post(recipients::ensure_recipient),
        )
}
