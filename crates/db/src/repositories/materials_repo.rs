//! Repository for the `materials_lists` and `material_items` tables.
//!
//! A ticket owns at most one list; edits replace the whole item set
//! (delete-then-insert inside one transaction), never a partial merge.

use sqlx::PgPool;

use obralink_core::types::DbId;

use crate::models::materials::{MaterialItem, MaterialsList, MaterialsListInput};

const LIST_COLUMNS: &str = "id, ticket_id, name, description, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, list_id, position, material, quantity, unit, spec, comment, created_at, updated_at";

/// Provides replace/read operations for a ticket's materials list.
pub struct MaterialsRepo;

impl MaterialsRepo {
    /// Replace a ticket's materials list and items.
    ///
    /// Upserts the list header, deletes every existing item, then inserts
    /// the new items with positions taken from input order. An empty item
    /// vector leaves a list with zero items, which is the documented way
    /// to clear it.
    pub async fn replace_list(
        pool: &PgPool,
        ticket_id: DbId,
        input: &MaterialsListInput,
    ) -> Result<(MaterialsList, Vec<MaterialItem>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let list_query = format!(
            "INSERT INTO materials_lists (ticket_id, name, description)
             VALUES ($1, COALESCE($2, ''), $3)
             ON CONFLICT ON CONSTRAINT uq_materials_lists_ticket
             DO UPDATE SET name = COALESCE($2, ''), description = $3
             RETURNING {LIST_COLUMNS}"
        );
        let list = sqlx::query_as::<_, MaterialsList>(&list_query)
            .bind(ticket_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM material_items WHERE list_id = $1")
            .bind(list.id)
            .execute(&mut *tx)
            .await?;

        let item_query = format!(
            "INSERT INTO material_items (list_id, position, material, quantity, unit, spec, comment)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(input.items.len());
        for (position, item) in input.items.iter().enumerate() {
            let row = sqlx::query_as::<_, MaterialItem>(&item_query)
                .bind(list.id)
                .bind(position as i32)
                .bind(&item.material)
                .bind(item.quantity)
                .bind(&item.unit)
                .bind(&item.spec)
                .bind(&item.comment)
                .fetch_one(&mut *tx)
                .await?;
            items.push(row);
        }

        tx.commit().await?;
        Ok((list, items))
    }

    /// Fetch a ticket's materials list with its items in position order.
    pub async fn get_list(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Option<(MaterialsList, Vec<MaterialItem>)>, sqlx::Error> {
        let list_query = format!("SELECT {LIST_COLUMNS} FROM materials_lists WHERE ticket_id = $1");
        let Some(list) = sqlx::query_as::<_, MaterialsList>(&list_query)
            .bind(ticket_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let item_query = format!(
            "SELECT {ITEM_COLUMNS} FROM material_items WHERE list_id = $1 ORDER BY position ASC"
        );
        let items = sqlx::query_as::<_, MaterialItem>(&item_query)
            .bind(list.id)
            .fetch_all(pool)
            .await?;

        Ok(Some((list, items)))
    }
}
