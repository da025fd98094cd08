//! Recipient (negotiation thread) model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use obralink_core::types::{DbId, Timestamp};

/// A row from the `recipients` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Recipient {
    pub id: DbId,
    pub ticket_id: DbId,
    pub ticket_creator_id: DbId,
    pub recipient_profile_id: Option<DbId>,
    pub recipient_phone: Option<String>,
    pub recipient_email: Option<String>,
    pub identity_key: String,
    pub status: String,
    pub accepted_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub offer_amount: Option<f64>,
    pub offer_message: Option<String>,
    pub offer_days: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for inserting a recipient row.
///
/// Exactly one of `recipient_profile_id` / `recipient_phone` /
/// `recipient_email` meaningfully identifies the target; when the profile
/// id is known the raw fields stay `None` so a single identity never
/// appears twice under different spellings.
#[derive(Debug, Clone)]
pub struct CreateRecipient {
    pub ticket_id: DbId,
    pub ticket_creator_id: DbId,
    pub recipient_profile_id: Option<DbId>,
    pub recipient_phone: Option<String>,
    pub recipient_email: Option<String>,
    pub identity_key: String,
}

/// Body of a responder's offer submission.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferRequest {
    pub amount: Option<f64>,
    pub message: Option<String>,
    pub estimated_days: Option<i32>,
}
