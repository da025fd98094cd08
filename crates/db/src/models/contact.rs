//! Address-book contact model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use obralink_core::types::{DbId, Timestamp};

/// A row from the `contacts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Contact {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub rating: Option<i16>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a contact.
#[derive(Debug, Deserialize)]
pub struct CreateContact {
    pub name: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub rating: Option<i16>,
    pub notes: Option<String>,
}

/// DTO for updating a contact.
#[derive(Debug, Deserialize)]
pub struct UpdateContact {
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub rating: Option<i16>,
    pub notes: Option<String>,
}

/// Query parameters for listing contacts.
#[derive(Debug, Deserialize)]
pub struct ContactListParams {
    pub category: Option<String>,
}
