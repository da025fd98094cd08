//! The dispatch orchestrator.
//!
//! One call takes a ticket (new draft or existing id) plus a list of raw
//! targets, and:
//!
//! 1. validates the draft and the target list before any write,
//! 2. resolves every target against a directory snapshot, so an invalid
//!    target aborts the call before anything is persisted,
//! 3. creates or updates the ticket and plans deduplication against its
//!    existing recipients,
//! 4. creates the primary target's recipient row, composes its message
//!    and returns the outbound link synchronously,
//! 5. creates the remaining rows in a background task, one failure never
//!    aborting its siblings or the response.
//!
//! There is no transaction across these steps: a ticket created here that
//! never gets a recipient stays editable and re-dispatchable.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use obralink_core::dispatch::{plan_dispatch, DispatchPlan, PlannedTarget};
use obralink_core::error::CoreError;
use obralink_core::identity::{resolve, DirectoryContact, DirectorySnapshot, DirectoryUser, TargetKind};
use obralink_core::message::{compose, ComposedMessage, MaterialLine, TicketSummary};
use obralink_core::ticket::validate_draft;
use obralink_core::types::DbId;
use obralink_db::models::recipient::CreateRecipient;
use obralink_db::models::ticket::{CreateTicket, Ticket, UpdateTicket};
use obralink_db::repositories::{ContactRepo, MaterialsRepo, RecipientRepo, TicketRepo, UserRepo};
use obralink_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /tickets/dispatch`.
///
/// Either `ticket_id` (re-dispatch of an existing ticket, optionally
/// editing it via `ticket`) or `ticket` alone (create-and-dispatch).
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub ticket_id: Option<DbId>,
    pub ticket: Option<CreateTicket>,
    pub targets: Vec<String>,
}

/// Response: the ticket and the pre-filled channel link for the primary
/// target. Remaining recipient rows may still be in flight.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub ticket_id: DbId,
    pub outbound_url: String,
    pub message_text: String,
}

/// POST /tickets/dispatch
pub async fn dispatch(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<DispatchRequest>,
) -> AppResult<impl IntoResponse> {
    if input.targets.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Dispatch requires at least one target".into(),
        )));
    }

    // Snapshot both directories once; resolution is pure over it. Every
    // target must resolve before the first write so a bad target cannot
    // leave a half-dispatched ticket behind.
    let snapshot = directory_snapshot(&state.pool, auth.user_id).await?;
    let country_code = &state.config.dispatch.default_country_code;

    let mut resolved = Vec::with_capacity(input.targets.len());
    for raw in &input.targets {
        resolved.push(resolve(raw, &snapshot, country_code)?);
    }

    let ticket = upsert_ticket(&state, &auth, &input).await?;

    let existing = RecipientRepo::list_by_ticket(&state.pool, ticket.id).await?;
    let existing_keys = existing.iter().map(|r| r.identity_key.clone()).collect();
    let plan = plan_dispatch(resolved, &existing_keys);

    let primary = plan.primary().ok_or_else(|| {
        CoreError::Validation("Dispatch requires at least one target".to_string())
    })?;

    if plan.primary_is_new {
        create_recipient_row(&state.pool, &ticket, primary).await?;
    }

    let message = compose_for(&state, &ticket, primary).await?;

    spawn_remaining(&state.pool, &ticket, &plan);

    tracing::info!(
        user_id = auth.user_id,
        ticket_id = ticket.id,
        created = plan.to_create.len(),
        reused = plan.to_reuse.len(),
        "Ticket dispatched"
    );

    Ok(Json(DataResponse {
        data: DispatchResponse {
            ticket_id: ticket.id,
            outbound_url: message.outbound_url,
            message_text: message.text,
        },
    }))
}

/// Create the ticket if the request carries a draft, else load and
/// optionally edit the existing one. Never touches the soft-delete state.
async fn upsert_ticket(
    state: &AppState,
    auth: &AuthUser,
    input: &DispatchRequest,
) -> Result<Ticket, AppError> {
    match (input.ticket_id, &input.ticket) {
        (Some(id), draft) => {
            let ticket =
                super::tickets::load_owned_ticket(&state.pool, id, auth.user_id).await?;
            if ticket.deleted_at.is_some() {
                return Err(AppError::Core(CoreError::Conflict(
                    "Deleted tickets cannot be dispatched; restore first".into(),
                )));
            }

            let Some(draft) = draft else {
                return Ok(ticket);
            };
            validate_draft(&draft.title, &draft.description)?;
            super::tickets::validate_ticket_fields(
                draft.category.as_deref(),
                draft.priority.as_deref(),
            )?;

            let update = UpdateTicket {
                project_name: draft.project_name.clone(),
                title: Some(draft.title.clone()),
                description: Some(draft.description.clone()),
                category: draft.category.clone(),
                priority: draft.priority.clone(),
                start_date: draft.start_date,
                end_date: draft.end_date,
                due_date: draft.due_date,
                materials: None,
            };
            let updated = TicketRepo::update(&state.pool, id, &update)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "ticket",
                    id,
                })?;

            if let Some(materials) = &draft.materials {
                MaterialsRepo::replace_list(&state.pool, id, materials).await?;
            }
            Ok(updated)
        }
        (None, Some(draft)) => {
            validate_draft(&draft.title, &draft.description)?;
            super::tickets::validate_ticket_fields(
                draft.category.as_deref(),
                draft.priority.as_deref(),
            )?;
            let ticket =
                TicketRepo::create(&state.pool, auth.user_id, &auth.role, draft).await?;
            if let Some(materials) = &draft.materials {
                MaterialsRepo::replace_list(&state.pool, ticket.id, materials).await?;
            }
            Ok(ticket)
        }
        (None, None) => Err(AppError::Core(CoreError::Validation(
            "Dispatch requires a ticket draft or an existing ticket id".into(),
        ))),
    }
}

/// Fetch the platform-user and address-book directories as one read-only
/// snapshot for the resolver.
async fn directory_snapshot(
    pool: &DbPool,
    owner_id: DbId,
) -> Result<DirectorySnapshot, AppError> {
    let users = UserRepo::directory(pool)
        .await?
        .into_iter()
        .map(|u| DirectoryUser {
            id: u.id,
            phone: u.phone,
            email: u.email,
        })
        .collect();

    let contacts = ContactRepo::directory(pool, owner_id)
        .await?
        .into_iter()
        .map(|c| DirectoryContact {
            id: c.id,
            phone: c.phone,
            email: c.email,
        })
        .collect();

    Ok(DirectorySnapshot { users, contacts })
}

/// Build the insert row for one planned target.
fn recipient_input(ticket: &Ticket, planned: &PlannedTarget) -> CreateRecipient {
    let target = &planned.target;
    let (phone, email) = if target.matched_user_id.is_some() {
        // Known platform user: raw fields stay empty so one identity never
        // appears under two spellings.
        (None, None)
    } else {
        match target.kind {
            TargetKind::Phone => (Some(target.normalized.clone()), None),
            TargetKind::Email => (None, Some(target.normalized.clone())),
        }
    };

    CreateRecipient {
        ticket_id: ticket.id,
        ticket_creator_id: ticket.creator_id,
        recipient_profile_id: target.matched_user_id,
        recipient_phone: phone,
        recipient_email: email,
        identity_key: planned.key.clone(),
    }
}

/// Insert a recipient row, treating a lost race on the unique identity
/// constraint as reuse of the concurrently created row.
async fn create_recipient_row(
    pool: &DbPool,
    ticket: &Ticket,
    planned: &PlannedTarget,
) -> Result<(), AppError> {
    match RecipientRepo::create(pool, &recipient_input(ticket, planned)).await {
        Ok(_) => Ok(()),
        Err(err) => {
            if let Some(existing) =
                RecipientRepo::find_by_identity(pool, ticket.id, &planned.key).await?
            {
                tracing::debug!(
                    ticket_id = ticket.id,
                    identity_key = %planned.key,
                    recipient_id = existing.id,
                    "Recipient already created concurrently, reusing"
                );
                Ok(())
            } else {
                Err(AppError::Database(err))
            }
        }
    }
}

/// Compose the outbound message for the primary target.
async fn compose_for(
    state: &AppState,
    ticket: &Ticket,
    primary: &PlannedTarget,
) -> Result<ComposedMessage, AppError> {
    let materials = MaterialsRepo::get_list(&state.pool, ticket.id).await?;
    let lines: Vec<MaterialLine<'_>> = materials
        .as_ref()
        .map(|(_, items)| {
            items
                .iter()
                .map(|i| MaterialLine {
                    material: &i.material,
                    quantity: i.quantity,
                    unit: &i.unit,
                })
                .collect()
        })
        .unwrap_or_default();

    let summary = TicketSummary {
        ticket_id: ticket.id,
        creator_role: &ticket.creator_role,
        category: &ticket.category,
        project_name: ticket.project_name.as_deref(),
        title: &ticket.title,
        description: &ticket.description,
        start_date: ticket.start_date,
        end_date: ticket.end_date,
        due_date: ticket.due_date,
    };

    let config = state.config.dispatch.composer();
    Ok(compose(&summary, &lines, &primary.target, &config)?)
}

/// Create recipient rows for every non-primary target without blocking
/// the response. Each creation is awaited and logged individually; one
/// failure never cancels its siblings.
fn spawn_remaining(pool: &DbPool, ticket: &Ticket, plan: &DispatchPlan) {
    let skip_first = usize::from(plan.primary_is_new);
    let inputs: Vec<CreateRecipient> = plan
        .to_create
        .iter()
        .skip(skip_first)
        .map(|planned| recipient_input(ticket, planned))
        .collect();

    if inputs.is_empty() {
        return;
    }

    let pool = pool.clone();
    let ticket_id = ticket.id;
    tokio::spawn(async move {
        let creations = inputs.into_iter().map(|input| {
            let pool = pool.clone();
            async move {
                if let Err(err) = RecipientRepo::create(&pool, &input).await {
                    tracing::warn!(
                        ticket_id,
                        identity_key = %input.identity_key,
                        error = %err,
                        "Background recipient creation failed"
                    );
                }
            }
        });
        futures::future::join_all(creations).await;
    });
}
