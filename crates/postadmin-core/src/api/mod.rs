//! Authenticated request layer for the administration API.
//!
//! This module provides the `RequestClient`, the single choke point every
//! outbound call goes through. It attaches the bearer token from the
//! session store, classifies responses and, on a 401, clears the session
//! and schedules a return to the login page.
//!
//! The wire is abstracted behind `Transport` so classification can be
//! exercised without a server; `ReqwestTransport` is the real one.

pub mod assistant;
pub mod client;
pub mod error;
pub mod request;
pub mod transport;

pub use assistant::{AssistMode, AssistRequest, AssistResponse, AssistStatus, Tone};
pub use client::RequestClient;
pub use error::{RequestError, TransportError};
pub use request::{Body, HttpRequest, RawResponse, RequestDescriptor, ResponseClass};
pub use transport::{ReqwestTransport, Transport};
