//! Repository for the `recipients` table.
//!
//! Rows are keyed by `(ticket_id, identity_key)` and never deleted, only
//! transitioned. Status writes are last-writer-wins by design; there is no
//! optimistic concurrency token on this table.

use sqlx::PgPool;

use obralink_core::types::DbId;

use crate::models::recipient::{CreateRecipient, Recipient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, ticket_id, ticket_creator_id, recipient_profile_id, \
    recipient_phone, recipient_email, identity_key, status, accepted_at, rejected_at, \
    offer_amount, offer_message, offer_days, created_at, updated_at";

/// Provides CRUD and state-transition operations for recipients.
pub struct RecipientRepo;

impl RecipientRepo {
    /// Insert a new recipient row in `sent` state, returning it.
    ///
    /// Violating `uq_recipients_ticket_identity` means a concurrent
    /// dispatch already created this identity's row; callers treat that as
    /// reuse, not failure.
    pub async fn create(pool: &PgPool, input: &CreateRecipient) -> Result<Recipient, sqlx::Error> {
        let query = format!(
            "INSERT INTO recipients
                (ticket_id, ticket_creator_id, recipient_profile_id,
                 recipient_phone, recipient_email, identity_key)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(input.ticket_id)
            .bind(input.ticket_creator_id)
            .bind(input.recipient_profile_id)
            .bind(&input.recipient_phone)
            .bind(&input.recipient_email)
            .bind(&input.identity_key)
            .fetch_one(pool)
            .await
    }

    /// Find a recipient by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Recipient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipients WHERE id = $1");
        sqlx::query_as::<_, Recipient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the row covering a canonical identity on a ticket.
    pub async fn find_by_identity(
        pool: &PgPool,
        ticket_id: DbId,
        identity_key: &str,
    ) -> Result<Option<Recipient>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM recipients WHERE ticket_id = $1 AND identity_key = $2");
        sqlx::query_as::<_, Recipient>(&query)
            .bind(ticket_id)
            .bind(identity_key)
            .fetch_optional(pool)
            .await
    }

    /// List all recipients of a ticket in dispatch order.
    pub async fn list_by_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<Recipient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipients WHERE ticket_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }

    /// Find the row belonging to an acting responder on a ticket.
    ///
    /// Matches by profile id first, then by the actor's normalized phone,
    /// then email. The phone/email legs cover rows created before the
    /// target signed up.
    pub async fn find_for_actor(
        pool: &PgPool,
        ticket_id: DbId,
        profile_id: DbId,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Recipient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipients
             WHERE ticket_id = $1
               AND (recipient_profile_id = $2
                    OR ($3::text IS NOT NULL AND recipient_phone = $3)
                    OR ($4::text IS NOT NULL AND recipient_email = $4))
             ORDER BY (recipient_profile_id = $2) DESC, id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(ticket_id)
            .bind(profile_id)
            .bind(phone)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Attach a platform profile to a row that was dispatched to a raw
    /// address, clearing the raw fields and rewriting the identity key.
    pub async fn claim_profile(
        pool: &PgPool,
        id: DbId,
        profile_id: DbId,
    ) -> Result<Option<Recipient>, sqlx::Error> {
        let query = format!(
            "UPDATE recipients SET
                recipient_profile_id = $2,
                recipient_phone = NULL,
                recipient_email = NULL,
                identity_key = 'user:' || $2::text
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(id)
            .bind(profile_id)
            .fetch_optional(pool)
            .await
    }

    /// Move a recipient to `in_review`, clearing both outcome timestamps.
    pub async fn mark_in_review(pool: &PgPool, id: DbId) -> Result<Option<Recipient>, sqlx::Error> {
        let query = format!(
            "UPDATE recipients SET
                status = 'in_review',
                accepted_at = NULL,
                rejected_at = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a recipient to `rejected`, stamping `rejected_at`.
    ///
    /// Offer fields are deliberately left intact: a rejection after an
    /// offer keeps the offer visible to the requester.
    pub async fn mark_rejected(pool: &PgPool, id: DbId) -> Result<Option<Recipient>, sqlx::Error> {
        let query = format!(
            "UPDATE recipients SET
                status = 'rejected',
                rejected_at = NOW(),
                accepted_at = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a recipient to `offered`, storing the offer fields and
    /// clearing both outcome timestamps. Re-offers overwrite the previous
    /// offer.
    pub async fn submit_offer(
        pool: &PgPool,
        id: DbId,
        amount: Option<f64>,
        message: Option<&str>,
        estimated_days: Option<i32>,
    ) -> Result<Option<Recipient>, sqlx::Error> {
        let query = format!(
            "UPDATE recipients SET
                status = 'offered',
                offer_amount = $2,
                offer_message = $3,
                offer_days = $4,
                accepted_at = NULL,
                rejected_at = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(id)
            .bind(amount)
            .bind(message)
            .bind(estimated_days)
            .fetch_optional(pool)
            .await
    }

    /// Degraded fallback for [`Self::submit_offer`]: transition the status
    /// without touching the offer columns. Used when persisting the
    /// auxiliary fields failed but the transition itself must succeed.
    pub async fn submit_offer_status_only(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Recipient>, sqlx::Error> {
        let query = format!(
            "UPDATE recipients SET
                status = 'offered',
                accepted_at = NULL,
                rejected_at = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
