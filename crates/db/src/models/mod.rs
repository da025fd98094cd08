//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where partial
//!   updates exist

pub mod contact;
pub mod materials;
pub mod recipient;
pub mod ticket;
pub mod user;
