//! Platform user model.
//!
//! The engine never manages accounts; it reads users as a dispatch
//! directory and to verify ticket ownership. Creation exists for seeding
//! and for the external profile service to call through.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use obralink_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: DbId,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// The directory projection consumed by the identity resolver.
#[derive(Debug, Clone, FromRow)]
pub struct UserDirectoryEntry {
    pub id: DbId,
    pub phone: Option<String>,
    pub email: Option<String>,
}
