//! Obralink domain engine.
//!
//! Pure business logic for the quote-ticket dispatch and negotiation flow:
//! identity resolution, dispatch deduplication, outbound message
//! composition, and the recipient state machine. No I/O lives here; the
//! `obralink-db` and `obralink-api` crates provide persistence and HTTP.

pub mod contact;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod message;
pub mod recipient;
pub mod ticket;
pub mod types;
