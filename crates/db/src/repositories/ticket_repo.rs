//! Repository for the `tickets` table.

use sqlx::PgPool;

use obralink_core::types::DbId;

use crate::models::ticket::{CreateTicket, Ticket, UpdateTicket};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, creator_id, creator_role, project_name, title, description, \
    category, priority, start_date, end_date, due_date, status, deleted_at, \
    created_at, updated_at";

/// Provides CRUD and lifecycle operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new ticket, returning the created row.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        creator_role: &str,
        input: &CreateTicket,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets
                (creator_id, creator_role, project_name, title, description,
                 category, priority, start_date, end_date, due_date)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'labor'), COALESCE($7, 'medium'), $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(creator_id)
            .bind(creator_role)
            .bind(&input.project_name)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.priority)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by ID, including soft-deleted rows.
    ///
    /// Tickets stay fully queryable by id after soft-delete (that is what
    /// makes restore possible), so there is no hidden `deleted_at` filter
    /// here; listing is where the active/deleted split happens.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a creator's tickets, newest first.
    ///
    /// With `include_deleted = false` only active rows are returned; the
    /// deleted/active split is a pure filter on `deleted_at`.
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: DbId,
        include_deleted: bool,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let filter = if include_deleted {
            ""
        } else {
            " AND deleted_at IS NULL"
        };
        let query = format!(
            "SELECT {COLUMNS} FROM tickets
             WHERE creator_id = $1{filter}
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(creator_id)
            .fetch_all(pool)
            .await
    }

    /// Update a ticket's mutable fields. Only non-`None` fields are applied.
    ///
    /// Never touches `deleted_at`; soft-delete and restore are separate
    /// operations. Returns `None` if no active row with the given id exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTicket,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET
                project_name = COALESCE($2, project_name),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                priority = COALESCE($6, priority),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                due_date = COALESCE($9, due_date)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(&input.project_name)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.priority)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a ticket. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted ticket. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
