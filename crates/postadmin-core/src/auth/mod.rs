//! Authentication module for the client-side session.
//!
//! This module provides:
//! - `SessionStore`: The single-token store shared by the request client and
//!   the navigation guard
//! - `MemorySessionStore`, `FileSessionStore`: In-process and on-disk stores
//! - `KeyringSessionStore`: OS-level token storage via keyring
//! - `login`: Exchange of username/password for a bearer token
//!
//! Presence of a token is the only authentication signal; tokens carry no
//! client-side expiry.

pub mod keychain;
pub mod login;
pub mod session;

pub use keychain::KeyringSessionStore;
pub use login::{authenticate, TokenResponse};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};
