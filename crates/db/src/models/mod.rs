//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row (or joined view)
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod category;
pub mod comment;
pub mod genre;
pub mod review;
pub mod title;
pub mod user;
