//! Shared fixtures for db integration tests.

use sqlx::PgPool;

use obralink_db::models::ticket::{CreateTicket, Ticket};
use obralink_db::models::user::{CreateUser, User};
use obralink_db::repositories::{TicketRepo, UserRepo};

/// Insert a user with the given addresses.
pub async fn seed_user(pool: &PgPool, name: &str, phone: Option<&str>, email: Option<&str>) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: name.to_string(),
            phone: phone.map(str::to_string),
            email: email.map(str::to_string),
            role: None,
        },
    )
    .await
    .unwrap()
}

/// A minimal valid ticket draft.
pub fn ticket_draft(title: &str) -> CreateTicket {
    CreateTicket {
        project_name: None,
        title: title.to_string(),
        description: "integration test ticket".to_string(),
        category: Some("materials".to_string()),
        priority: None,
        start_date: None,
        end_date: None,
        due_date: None,
        materials: None,
    }
}

/// Insert a ticket owned by `creator_id`.
pub async fn seed_ticket(pool: &PgPool, creator_id: i64, title: &str) -> Ticket {
    TicketRepo::create(pool, creator_id, "constructor", &ticket_draft(title))
        .await
        .unwrap()
}
