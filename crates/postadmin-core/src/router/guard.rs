use std::sync::Arc;

use tracing::debug;

use crate::auth::SessionStore;

use super::routes::{Location, LANDING_PATH, LOGIN_PATH, LOGIN_ROUTE, REDIRECT_QUERY_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(Location),
}

/// Authentication check run before every route transition.
///
/// Only reads the session store; never does I/O of its own.
#[derive(Clone)]
pub struct NavigationGuard {
    session: Arc<dyn SessionStore>,
    landing_path: String,
}

impl NavigationGuard {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self {
            session,
            landing_path: LANDING_PATH.to_string(),
        }
    }

    pub fn with_landing_path(mut self, path: &str) -> Self {
        self.landing_path = path.to_string();
        self
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    pub fn is_login(location: &Location) -> bool {
        location.name.as_deref() == Some(LOGIN_ROUTE) || location.path == LOGIN_PATH
    }

    pub fn check(&self, from: &Location, to: &Location) -> GuardDecision {
        let authenticated = self.session.is_authenticated();

        let decision = if Self::is_login(to) {
            if authenticated {
                GuardDecision::Redirect(Location::new(&self.landing_path))
            } else {
                GuardDecision::Proceed
            }
        } else if !authenticated {
            GuardDecision::Redirect(
                Location::named(LOGIN_ROUTE, LOGIN_PATH)
                    .with_query(REDIRECT_QUERY_KEY, &to.full_path()),
            )
        } else {
            GuardDecision::Proceed
        };

        debug!(from = %from, to = %to, authenticated, ?decision, "Guard checked transition");
        decision
    }
}
