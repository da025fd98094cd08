//! Authentication building blocks.
//!
//! Token issuance lives in the external identity service; this module
//! only validates HS256 bearer tokens so creator-only operations can be
//! enforced.

pub mod jwt;
