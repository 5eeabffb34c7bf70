//! Core library for the postadmin administration client.
//!
//! This crate provides the authenticated request/session lifecycle used by
//! the admin front-end:
//!
//! - `auth`: Session token storage (memory, file, OS keychain) and login
//! - `api`: The `RequestClient` that injects the bearer token, classifies
//!   responses and tears the session down on 401
//! - `router`: Static route table, `NavigationGuard` and the `Router` that
//!   applies it to every page transition
//! - `shell`: Notification and navigation boundaries of the host application
//! - `config`: Persistent configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod router;
pub mod shell;

pub use api::{RequestClient, RequestDescriptor, RequestError};
pub use auth::{FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore};
pub use config::Config;
pub use router::{GuardDecision, Location, NavigationGuard, Router};
pub use shell::{Navigator, Notifier};
