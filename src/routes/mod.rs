//! Router Module Index
//!
//! Splits the API by access level. Access control is not a router layer here:
//! the admin guard runs inside the post service so an anonymous caller (401) and
//! a non-admin caller (403) get distinct answers.

/// Routes open to every caller: auth flow, health and all reads.
pub mod public;

/// Post mutations restricted to users with the 'admin' role.
pub mod admin;
