//! Repository for the `users` table.
//!
//! The engine treats accounts as externally managed; this repo only
//! creates rows (seeding / pass-through) and reads the dispatch directory.

use sqlx::PgPool;

use obralink_core::types::DbId;

use crate::models::user::{CreateUser, User, UserDirectoryEntry};

const COLUMNS: &str = "id, full_name, phone, email, role, created_at, updated_at";

/// Provides read and seed operations for platform users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (full_name, phone, email, role)
             VALUES ($1, $2, $3, COALESCE($4, 'constructor'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The full reachable-address directory consumed by the identity
    /// resolver. Users with neither phone nor email are excluded; they can
    /// never match a dispatch target.
    pub async fn directory(pool: &PgPool) -> Result<Vec<UserDirectoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, UserDirectoryEntry>(
            "SELECT id, phone, email FROM users
             WHERE phone IS NOT NULL OR email IS NOT NULL
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }
}
