//! Materials list and line item models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use obralink_core::types::{DbId, Timestamp};

/// A row from the `materials_lists` table (at most one per ticket).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MaterialsList {
    pub id: DbId,
    pub ticket_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `material_items` table, ordered by `position`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MaterialItem {
    pub id: DbId,
    pub list_id: DbId,
    pub position: i32,
    pub material: String,
    pub quantity: f64,
    pub unit: String,
    pub spec: Option<String>,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for one line item. Position is derived from input order.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialItemInput {
    pub material: String,
    pub quantity: f64,
    pub unit: String,
    pub spec: Option<String>,
    pub comment: Option<String>,
}

/// Input for a full materials list replacement.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialsListInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub items: Vec<MaterialItemInput>,
}
