//! Crucible API client — shared between the CLI and library callers.
//!
//! This crate is the single source of truth for the Crucible wire contract:
//! auth, create submission, attach runs/evidence, fetch state, delete.
//!
//! No retries. No caching. One blocking HTTP request per operation.

mod auth;
mod client;

pub use auth::{AuthCredentials, auth_file_path, load_auth, save_auth, delete_auth, DEFAULT_API_BASE};
pub use client::{ApiOutcome, CrucibleClient, CrucibleError, RawResponse};
