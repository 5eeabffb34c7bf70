//! Page navigation for the admin application.
//!
//! This module provides:
//! - `RouteTable`, `Location`: The static route list and parsed locations
//! - `NavigationGuard`: The per-transition authentication check
//! - `Router`: Current location plus guarded `push`, login completion and
//!   logout
//!
//! Unauthenticated users are sent to `/login?redirect=<intent>`; users with
//! a token are sent from `/login` to `/users`.

pub mod guard;
pub mod navigation;
pub mod routes;

pub use guard::{GuardDecision, NavigationGuard};
pub use navigation::{NavigationError, Router};
pub use routes::{Location, Route, RouteTable, LANDING_PATH, LOGIN_PATH, LOGIN_ROUTE, REDIRECT_QUERY_KEY};
