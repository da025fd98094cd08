//! Quote ticket model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use obralink_core::types::{DbId, Timestamp};

use crate::models::materials::MaterialsListInput;

/// A row from the `tickets` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ticket {
    pub id: DbId,
    pub creator_id: DbId,
    pub creator_role: String,
    pub project_name: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub project_name: Option<String>,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// Optional materials list created alongside the ticket.
    pub materials: Option<MaterialsListInput>,
}

/// DTO for editing a ticket's mutable fields.
///
/// The soft-delete state is never touched here; delete/restore have their
/// own operations.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTicket {
    pub project_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// When present, fully replaces the materials list (delete-then-insert).
    pub materials: Option<MaterialsListInput>,
}

/// Query parameters for listing tickets.
#[derive(Debug, Deserialize)]
pub struct TicketListParams {
    /// Include soft-deleted tickets (default false: active only).
    pub include_deleted: Option<bool>,
}
