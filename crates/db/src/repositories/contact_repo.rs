//! Repository for the `contacts` table.

use sqlx::PgPool;

use obralink_core::types::DbId;

use crate::models::contact::{Contact, CreateContact, UpdateContact};

const COLUMNS: &str = "id, owner_id, name, company, phone, email, category, subcategory, \
    rating, notes, created_at, updated_at";

/// Provides CRUD operations for address-book contacts.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a new contact, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateContact,
    ) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts
                (owner_id, name, company, phone, email, category, subcategory, rating, notes)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'labor'), $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.company)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.category)
            .bind(&input.subcategory)
            .bind(input.rating)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a contact by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's contacts, optionally filtered by category.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        category: Option<&str>,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let filter = if category.is_some() {
            " AND category = $2"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM contacts WHERE owner_id = $1{filter} ORDER BY name ASC"
        );
        let mut q = sqlx::query_as::<_, Contact>(&query).bind(owner_id);
        if let Some(category) = category {
            q = q.bind(category);
        }
        q.fetch_all(pool).await
    }

    /// Update a contact. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContact,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts SET
                name = COALESCE($2, name),
                company = COALESCE($3, company),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                category = COALESCE($6, category),
                subcategory = COALESCE($7, subcategory),
                rating = COALESCE($8, rating),
                notes = COALESCE($9, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.company)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.category)
            .bind(&input.subcategory)
            .bind(input.rating)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a contact. Returns `true` if a row was removed.
    ///
    /// Contacts are plain address-book entries, not negotiation state, so
    /// hard delete is fine here.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The resolver-facing projection of an owner's address book.
    pub async fn directory(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts
             WHERE owner_id = $1 AND (phone IS NOT NULL OR email IS NOT NULL)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
