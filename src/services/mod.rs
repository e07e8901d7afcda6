//! Business rules on top of the `db` queries. Admin-only operations take an
//! [`auth::Admin`] so they cannot be reached without passing the gate.

pub mod auth;
pub mod poll;
pub mod results;
pub mod vote;
