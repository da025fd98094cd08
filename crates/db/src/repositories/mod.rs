//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod contact_repo;
pub mod materials_repo;
pub mod recipient_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use contact_repo::ContactRepo;
pub use materials_repo::MaterialsRepo;
pub use recipient_repo::RecipientRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
