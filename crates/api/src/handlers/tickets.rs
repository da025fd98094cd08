//! Handlers for the ticket lifecycle: create, list, read, edit,
//! soft-delete, restore, and the materials list attached to a ticket.
//!
//! Tickets are only ever soft-deleted; the active/deleted split is a pure
//! filter on `deleted_at` and restore simply clears it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use obralink_core::error::CoreError;
use obralink_core::ticket::{
    category_has_materials, validate_category, validate_draft, validate_priority,
};
use obralink_core::types::DbId;
use obralink_db::models::materials::{MaterialItem, MaterialsList};
use obralink_db::models::ticket::{CreateTicket, Ticket, TicketListParams, UpdateTicket};
use obralink_db::repositories::{MaterialsRepo, RecipientRepo, TicketRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a ticket by id (including soft-deleted ones) and check that the
/// acting user is its creator.
pub(crate) async fn load_owned_ticket(
    pool: &PgPool,
    ticket_id: DbId,
    user_id: DbId,
) -> Result<Ticket, AppError> {
    let ticket = TicketRepo::find_by_id(pool, ticket_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ticket",
            id: ticket_id,
        })?;

    if ticket.creator_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the ticket creator may perform this action".into(),
        )));
    }

    Ok(ticket)
}

/// Validate the optional enum fields of a create/update payload.
pub(crate) fn validate_ticket_fields(
    category: Option<&str>,
    priority: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(category) = category {
        validate_category(category)?;
    }
    if let Some(priority) = priority {
        validate_priority(priority)?;
    }
    Ok(())
}

/// POST /tickets
///
/// Create a ticket without dispatching it (draft saved for later).
pub async fn create_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTicket>,
) -> AppResult<impl IntoResponse> {
    validate_draft(&input.title, &input.description)?;
    validate_ticket_fields(input.category.as_deref(), input.priority.as_deref())?;

    let ticket = TicketRepo::create(&state.pool, auth.user_id, &auth.role, &input).await?;

    if let Some(materials) = &input.materials {
        if category_has_materials(&ticket.category) {
            MaterialsRepo::replace_list(&state.pool, ticket.id, materials).await?;
        }
    }

    tracing::info!(user_id = auth.user_id, ticket_id = ticket.id, "Ticket created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /tickets?include_deleted=
///
/// List the acting user's tickets, active only by default.
pub async fn list_tickets(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<impl IntoResponse> {
    let tickets = TicketRepo::list_by_creator(
        &state.pool,
        auth.user_id,
        params.include_deleted.unwrap_or(false),
    )
    .await?;

    Ok(Json(DataResponse { data: tickets }))
}

/// GET /tickets/{id}
///
/// Readable by the creator and by responders enrolled on the ticket.
pub async fn get_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ticket",
            id,
        })?;

    if ticket.creator_id != auth.user_id {
        let addresses = super::recipients::actor_addresses(&state, auth.user_id).await?;
        let enrolled = RecipientRepo::find_for_actor(
            &state.pool,
            ticket.id,
            auth.user_id,
            addresses.phone.as_deref(),
            addresses.email.as_deref(),
        )
        .await?
        .is_some();
        if !enrolled {
            return Err(AppError::Core(CoreError::Forbidden(
                "Not a participant of this ticket".into(),
            )));
        }
    }

    Ok(Json(DataResponse { data: ticket }))
}

/// PUT /tickets/{id}
///
/// Replace the mutable fields; when a materials list is supplied it is
/// fully replaced (delete-then-insert), never merged.
pub async fn update_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicket>,
) -> AppResult<impl IntoResponse> {
    load_owned_ticket(&state.pool, id, auth.user_id).await?;

    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Ticket title must not be empty".into(),
            )));
        }
    }
    if let Some(description) = &input.description {
        if description.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Ticket description must not be empty".into(),
            )));
        }
    }
    validate_ticket_fields(input.category.as_deref(), input.priority.as_deref())?;

    let updated = TicketRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::Conflict(
            "Deleted tickets cannot be edited; restore first".to_string(),
        ))?;

    if let Some(materials) = &input.materials {
        MaterialsRepo::replace_list(&state.pool, id, materials).await?;
    }

    tracing::info!(user_id = auth.user_id, ticket_id = id, "Ticket updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /tickets/{id}
///
/// Soft delete: stamps `deleted_at`. Recipients are untouched.
pub async fn delete_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned_ticket(&state.pool, id, auth.user_id).await?;

    let deleted = TicketRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::Conflict(
            "Ticket is already deleted".into(),
        )));
    }

    tracing::info!(user_id = auth.user_id, ticket_id = id, "Ticket soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /tickets/{id}/restore
///
/// Clears the soft-delete stamp; only valid from the deleted state.
pub async fn restore_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned_ticket(&state.pool, id, auth.user_id).await?;

    let restored = TicketRepo::restore(&state.pool, id).await?;
    if !restored {
        return Err(AppError::Core(CoreError::Conflict(
            "Ticket is not deleted".into(),
        )));
    }

    let ticket = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ticket",
            id,
        })?;

    tracing::info!(user_id = auth.user_id, ticket_id = id, "Ticket restored");

    Ok(Json(DataResponse { data: ticket }))
}

/// Materials list payload: header plus ordered items.
#[derive(Debug, serde::Serialize)]
pub struct MaterialsPayload {
    pub list: MaterialsList,
    pub items: Vec<MaterialItem>,
}

/// GET /tickets/{id}/materials
pub async fn get_materials(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned_ticket(&state.pool, id, auth.user_id).await?;

    let (list, items) = MaterialsRepo::get_list(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "materials list",
            id,
        })?;

    Ok(Json(DataResponse {
        data: MaterialsPayload { list, items },
    }))
}
