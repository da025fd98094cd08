//! HTTP handlers.

pub mod contacts;
pub mod dispatch;
pub mod recipients;
pub mod tickets;
