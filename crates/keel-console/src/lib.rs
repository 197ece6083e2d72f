//! Admin console client for the Keel directory service.
//!
//! # Purpose
//! Everything the administrative front end needs behind its widgets: an
//! explicit login session, a user-directory client with a write-through cache
//! and local invariant guards, pure list filtering, per-field form validation,
//! and the permission matrix editor built on `keel-authz`.
//!
//! # How it fits
//! The directory service (`services/directory`) is the authority for all
//! records. This crate never mutates its cache until the service confirms a
//! change, and its local guards (last-admin, in-flight) exist only to fail
//! fast before a request is issued; the service enforces the same rules
//! authoritatively.
//!
//! # Key invariants
//! - The cache is a mirror: no optimistic mutation, failures leave it intact.
//! - Session state is an explicit value passed by the caller; there is no
//!   ambient current-user global.
//! - At most one mutation is in flight per record id.

pub mod config;
pub mod directory;
pub mod error;
pub mod filter;
mod http;
pub mod matrix;
pub mod session;
pub mod types;
pub mod validate;

pub use config::ConsoleConfig;
pub use directory::DirectoryClient;
pub use error::{ConsoleError, ConsoleResult};
pub use filter::UserFilter;
pub use matrix::{MatrixEditor, PermissionsClient, PolicySink};
pub use session::{AuthClient, Session};
pub use types::{NewUser, TempPasswordRequest, UserPatch, UserRecord, UserStatus};
