//! Route definitions for the `/contacts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contacts;
use crate::state::AppState;

/// Routes mounted at `/contacts`.
///
/// ```text
/// POST   /       -> create_contact
/// GET    /       -> list_contacts (?category=)
/// GET    /{id}   -> get_contact
/// PUT    /{id}   -> update_contact
/// DELETE /{id}   -> delete_contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(contacts::create_contact).get(contacts::list_contacts))
        .route(
            "/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
}
