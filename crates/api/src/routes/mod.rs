pub mod contacts;
pub mod health;
pub mod recipients;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tickets                          create (draft), list
/// /tickets/dispatch                 create-or-edit + dispatch (POST)
/// /tickets/{id}                     get, update, soft-delete
/// /tickets/{id}/restore             restore (POST)
/// /tickets/{id}/materials           materials list (GET)
/// /tickets/{id}/recipients          list threads (creator only)
/// /tickets/{id}/recipients/ensure   lazy responder enrollment (POST)
///
/// /recipients/{id}/review           responder opens the ticket (POST)
/// /recipients/{id}/reject           responder declines (POST)
/// /recipients/{id}/offer            responder quotes (POST)
///
/// /contacts                         create, list (?category=)
/// /contacts/{id}                    get, update, delete
/// ```
///
/// All routes require a Bearer token; `/health` at the root level is the
/// only public endpoint.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Ticket lifecycle, dispatch, and ticket-scoped recipients.
        .nest("/tickets", tickets::router())
        // Recipient state transitions.
        .nest("/recipients", recipients::router())
        // Address-book contacts feeding the dispatch directory.
        .nest("/contacts", contacts::router())
}
