//! Handlers for the address-book contacts that feed the dispatch
//! directory. Contacts are fully private to their owner.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use obralink_core::contact::{validate_contact_category, validate_rating};
use obralink_core::error::CoreError;
use obralink_core::types::DbId;
use obralink_db::models::contact::{Contact, ContactListParams, CreateContact, UpdateContact};
use obralink_db::repositories::ContactRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a contact and check the acting user owns it.
async fn load_owned_contact(
    state: &AppState,
    contact_id: DbId,
    user_id: DbId,
) -> Result<Contact, AppError> {
    let contact = ContactRepo::find_by_id(&state.pool, contact_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "contact",
            id: contact_id,
        })?;

    if contact.owner_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not the owner of this contact".into(),
        )));
    }

    Ok(contact)
}

fn validate_contact_fields(
    name: Option<&str>,
    category: Option<&str>,
    rating: Option<i16>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Contact name must not be empty".into(),
            ));
        }
    }
    if let Some(category) = category {
        validate_contact_category(category)?;
    }
    if let Some(rating) = rating {
        validate_rating(rating)?;
    }
    Ok(())
}

/// POST /contacts
pub async fn create_contact(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateContact>,
) -> AppResult<impl IntoResponse> {
    validate_contact_fields(Some(&input.name), input.category.as_deref(), input.rating)?;

    let contact = ContactRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, contact_id = contact.id, "Contact created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: contact })))
}

/// GET /contacts?category=
pub async fn list_contacts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ContactListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(category) = &params.category {
        validate_contact_category(category)?;
    }

    let contacts =
        ContactRepo::list_by_owner(&state.pool, auth.user_id, params.category.as_deref()).await?;

    Ok(Json(DataResponse { data: contacts }))
}

/// GET /contacts/{id}
pub async fn get_contact(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contact = load_owned_contact(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: contact }))
}

/// PUT /contacts/{id}
pub async fn update_contact(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContact>,
) -> AppResult<impl IntoResponse> {
    load_owned_contact(&state, id, auth.user_id).await?;
    validate_contact_fields(input.name.as_deref(), input.category.as_deref(), input.rating)?;

    let updated = ContactRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "contact",
            id,
        })?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /contacts/{id}
pub async fn delete_contact(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned_contact(&state, id, auth.user_id).await?;

    ContactRepo::delete(&state.pool, id).await?;

    tracing::info!(user_id = auth.user_id, contact_id = id, "Contact deleted");

    Ok(StatusCode::NO_CONTENT)
}
