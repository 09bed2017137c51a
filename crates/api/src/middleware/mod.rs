//! Authentication and authorization helpers for handlers.
//!
//! - [`auth::CurrentCaller`] -- resolves the optional Bearer token to a [`Caller`].
//! - [`rbac::require`] -- runs the role policy and maps denials to HTTP errors.
//!
//! [`Caller`]: yamdb_core::policy::Caller

pub mod auth;
pub mod rbac;
