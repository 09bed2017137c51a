//! Domain layer for the YaMDb catalog and review service.
//!
//! Everything here is pure: no database, no HTTP. The `db` crate persists
//! these rules and the `api` crate exposes them over axum.

pub mod accounts;
pub mod catalog;
pub mod confirmation;
pub mod error;
pub mod patch;
pub mod policy;
pub mod profile;
pub mod roles;
pub mod search;
pub mod types;
