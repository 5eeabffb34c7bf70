use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::SessionStore;
use crate::shell::Navigator;

use super::guard::{GuardDecision, NavigationGuard};
use super::routes::{Location, RouteTable, LOGIN_PATH, REDIRECT_QUERY_KEY};

/// Upper bound on chained redirects (static and guard) for one navigation.
const MAX_REDIRECTS: usize = 8;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Too many redirects navigating to {0}")]
    RedirectLoop(String),
}

/// Holds the current location and runs every transition through the
/// navigation guard.
pub struct Router {
    routes: RouteTable,
    guard: NavigationGuard,
    session: Arc<dyn SessionStore>,
    current: Mutex<Location>,
}

impl Router {
    pub fn new(routes: RouteTable, session: Arc<dyn SessionStore>) -> Self {
        Self {
            routes,
            guard: NavigationGuard::new(Arc::clone(&session)),
            session,
            current: Mutex::new(Location::new("/")),
        }
    }

    pub fn with_guard(mut self, guard: NavigationGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn current(&self) -> Location {
        self.current.lock().clone()
    }

    /// Attach the route name and apply static redirects.
    fn resolve(&self, mut location: Location) -> Location {
        let mut hops = 0;
        while let Some(route) = self.routes.resolve(&location.path) {
            match route.redirect {
                Some(target) if hops < MAX_REDIRECTS => {
                    hops += 1;
                    location.path = target.to_string();
                    location.name = None;
                }
                _ => {
                    location.name = route.name.map(str::to_string);
                    break;
                }
            }
        }
        location
    }

    /// Navigate to `target` (a full path, query allowed). Returns where the
    /// application actually ended up after guard redirects.
    pub fn push(&self, target: &str) -> Result<Location, NavigationError> {
        let from = self.current();
        let mut to = self.resolve(Location::parse(target));

        for _ in 0..MAX_REDIRECTS {
            match self.guard.check(&from, &to) {
                GuardDecision::Proceed => {
                    info!(from = %from, to = %to, "Navigated");
                    *self.current.lock() = to.clone();
                    return Ok(to);
                }
                GuardDecision::Redirect(next) => {
                    debug!(requested = %to, redirect = %next, "Transition redirected");
                    to = self.resolve(next);
                }
            }
        }

        warn!(path = target, "Navigation exceeded redirect limit");
        Err(NavigationError::RedirectLoop(target.to_string()))
    }

    /// Route intent captured on the current login location, if any.
    pub fn route_intent(&self) -> Option<String> {
        let current = self.current.lock();
        if !NavigationGuard::is_login(&current) {
            return None;
        }
        current
            .query_value(REDIRECT_QUERY_KEY)
            .filter(|intent| intent.starts_with('/') && !intent.starts_with("//"))
            .map(str::to_string)
    }

    /// Store a freshly issued token and forward the user to their route
    /// intent, or the landing page when there is none.
    pub fn complete_login(&self, token: &str) -> Result<Location, NavigationError> {
        let intent = self.route_intent();
        self.session.set(token);
        let destination = intent.unwrap_or_else(|| self.guard.landing_path().to_string());
        self.push(&destination)
    }

    /// Drop the session and return to the login page.
    pub fn logout(&self) -> Result<Location, NavigationError> {
        self.session.clear();
        info!("Logged out");
        self.push(LOGIN_PATH)
    }
}

impl Navigator for Router {
    fn navigate_to_login(&self) {
        if let Err(e) = self.push(LOGIN_PATH) {
            warn!(error = %e, "Forced navigation to login failed");
        }
    }
}
