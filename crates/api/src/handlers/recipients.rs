//! Handlers for the recipient state machine.
//!
//! A recipient row is one negotiation thread. The creator lists all
//! threads of a ticket; a responder may only read and transition their
//! own. Enrollment is lazy: responders who arrived via the channel link
//! call `ensure` once and get their row matched or created.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use obralink_core::error::CoreError;
use obralink_core::identity::{normalize_email, normalize_phone};
use obralink_core::recipient::{validate_offer, OfferInput};
use obralink_core::types::DbId;
use obralink_db::models::recipient::{CreateRecipient, OfferRequest, Recipient};
use obralink_db::repositories::{RecipientRepo, TicketRepo, UserRepo};
use obralink_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// The acting user's contact addresses, normalized the same way dispatch
/// normalizes targets so they compare equal to stored recipient fields.
pub(crate) struct ActorAddresses {
    pub(crate) phone: Option<String>,
    pub(crate) email: Option<String>,
}

pub(crate) async fn actor_addresses(
    state: &AppState,
    user_id: DbId,
) -> Result<ActorAddresses, AppError> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;

    // A profile phone that fails normalization just falls out of the
    // match; it cannot have produced a recipient row either.
    let phone = user.phone.as_deref().and_then(|p| {
        normalize_phone(p, &state.config.dispatch.default_country_code).ok()
    });
    let email = user.email.as_deref().map(normalize_email);

    Ok(ActorAddresses { phone, email })
}

/// Load a recipient row and check the acting user is its responder.
///
/// Profile-matched rows compare by id; rows still keyed to a raw address
/// compare against the actor's normalized phone and email.
async fn load_own_recipient(
    state: &AppState,
    recipient_id: DbId,
    auth: &AuthUser,
) -> Result<Recipient, AppError> {
    let recipient = RecipientRepo::find_by_id(&state.pool, recipient_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "recipient",
            id: recipient_id,
        })?;

    if recipient.recipient_profile_id == Some(auth.user_id) {
        return Ok(recipient);
    }

    if recipient.recipient_profile_id.is_none() {
        let addresses = actor_addresses(state, auth.user_id).await?;
        let phone_matches = recipient.recipient_phone.is_some()
            && recipient.recipient_phone == addresses.phone;
        let email_matches = recipient.recipient_email.is_some()
            && recipient.recipient_email == addresses.email;
        if phone_matches || email_matches {
            return Ok(recipient);
        }
    }

    Err(AppError::Core(CoreError::Forbidden(
        "Not the responder of this thread".into(),
    )))
}

/// GET /tickets/{id}/recipients
///
/// Creator only: every negotiation thread of the ticket in dispatch order.
pub async fn list_recipients(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    super::tickets::load_owned_ticket(&state.pool, ticket_id, auth.user_id).await?;

    let recipients = RecipientRepo::list_by_ticket(&state.pool, ticket_id).await?;
    Ok(Json(DataResponse { data: recipients }))
}

/// POST /tickets/{id}/recipients/ensure
///
/// Lazy enrollment for a responder who opened the ticket from the channel
/// link. Matches an existing row by profile id, then by normalized phone,
/// then by email; an address-matched row is upgraded to the profile id.
/// When nothing matches a fresh `sent` row is created. The ticket creator
/// has no thread of their own and gets a 403.
pub async fn ensure_recipient(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = TicketRepo::find_by_id(&state.pool, ticket_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ticket",
            id: ticket_id,
        })?;

    if ticket.creator_id == auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "The ticket creator cannot enroll as a recipient".into(),
        )));
    }

    let addresses = actor_addresses(&state, auth.user_id).await?;
    let existing = RecipientRepo::find_for_actor(
        &state.pool,
        ticket_id,
        auth.user_id,
        addresses.phone.as_deref(),
        addresses.email.as_deref(),
    )
    .await?;

    if let Some(recipient) = existing {
        let recipient = if recipient.recipient_profile_id.is_none() {
            RecipientRepo::claim_profile(&state.pool, recipient.id, auth.user_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "recipient",
                    id: recipient.id,
                })?
        } else {
            recipient
        };
        return Ok((StatusCode::OK, Json(DataResponse { data: recipient })).into_response());
    }

    let input = CreateRecipient {
        ticket_id,
        ticket_creator_id: ticket.creator_id,
        recipient_profile_id: Some(auth.user_id),
        recipient_phone: None,
        recipient_email: None,
        identity_key: format!("user:{}", auth.user_id),
    };
    let recipient = create_or_reuse(&state.pool, ticket_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        ticket_id,
        recipient_id = recipient.id,
        "Recipient enrolled"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: recipient })).into_response())
}

/// Insert the row, falling back to the concurrently created one when the
/// identity constraint fires.
async fn create_or_reuse(
    pool: &DbPool,
    ticket_id: DbId,
    input: &CreateRecipient,
) -> Result<Recipient, AppError> {
    match RecipientRepo::create(pool, input).await {
        Ok(recipient) => Ok(recipient),
        Err(err) => RecipientRepo::find_by_identity(pool, ticket_id, &input.identity_key)
            .await?
            .ok_or(AppError::Database(err)),
    }
}

/// POST /recipients/{id}/review
pub async fn mark_in_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_own_recipient(&state, id, &auth).await?;

    let recipient = RecipientRepo::mark_in_review(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "recipient",
            id,
        })?;

    Ok(Json(DataResponse { data: recipient }))
}

/// POST /recipients/{id}/reject
pub async fn mark_rejected(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_own_recipient(&state, id, &auth).await?;

    let recipient = RecipientRepo::mark_rejected(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "recipient",
            id,
        })?;

    tracing::info!(
        user_id = auth.user_id,
        recipient_id = id,
        "Recipient rejected the request"
    );

    Ok(Json(DataResponse { data: recipient }))
}

/// Offer response: the row plus whether the auxiliary offer fields made
/// it to storage. `offer_fields_saved: false` signals the degraded path.
#[derive(Debug, Serialize)]
pub struct OfferResponse {
    #[serde(flatten)]
    pub recipient: Recipient,
    pub offer_fields_saved: bool,
}

/// POST /recipients/{id}/offer
///
/// Validates the offer, then transitions to `offered`. When persisting
/// the offer fields fails the transition is retried status-only so the
/// responder's action is never silently lost.
pub async fn submit_offer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<OfferRequest>,
) -> AppResult<impl IntoResponse> {
    load_own_recipient(&state, id, &auth).await?;

    validate_offer(&OfferInput {
        amount: input.amount,
        estimated_days: input.estimated_days,
    })?;

    let (recipient, fields_saved) = match RecipientRepo::submit_offer(
        &state.pool,
        id,
        input.amount,
        input.message.as_deref(),
        input.estimated_days,
    )
    .await
    {
        Ok(Some(recipient)) => (recipient, true),
        Ok(None) => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "recipient",
                id,
            }))
        }
        Err(err) => {
            tracing::warn!(
                recipient_id = id,
                error = %err,
                "Persisting offer fields failed, retrying status-only"
            );
            let recipient = RecipientRepo::submit_offer_status_only(&state.pool, id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "recipient",
                    id,
                })?;
            (recipient, false)
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        recipient_id = id,
        offer_fields_saved = fields_saved,
        "Offer submitted"
    );

    Ok(Json(DataResponse {
        data: OfferResponse {
            recipient,
            offer_fields_saved: fields_saved,
        },
    }))
}
