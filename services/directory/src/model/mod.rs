//! Directory data model module.
//!
//! # Purpose
//! Re-exports the user records and view payloads shared by the API and store
//! layers.
mod user;

pub use user::{NewUserRecord, User, UserPatchRecord, UserStatus, UserView};
