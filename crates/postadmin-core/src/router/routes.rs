use std::collections::BTreeMap;
use std::fmt;

/// Name of the login route
pub const LOGIN_ROUTE: &str = "login";

pub const LOGIN_PATH: &str = "/login";

/// Default page for an authenticated user.
pub const LANDING_PATH: &str = "/users";

/// Query parameter carrying the route intent on the login redirect
pub const REDIRECT_QUERY_KEY: &str = "redirect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: Option<&'static str>,
    pub path: &'static str,
    /// Static redirect applied before the guard runs.
    pub redirect: Option<&'static str>,
}

impl Route {
    const fn named(name: &'static str, path: &'static str) -> Self {
        Self {
            name: Some(name),
            path,
            redirect: None,
        }
    }

    const fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            name: None,
            path,
            redirect: Some(to),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Routes of the administration console.
    pub fn admin() -> Self {
        Self::new(vec![
            Route::named(LOGIN_ROUTE, LOGIN_PATH),
            Route::redirect("/", LANDING_PATH),
            Route::named("users", "/users"),
            Route::named("posts", "/posts"),
            Route::named("stats", "/stats"),
        ])
    }

    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == Some(name))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::admin()
    }
}

/// A navigation target: path, optional route name and query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub name: Option<String>,
    pub query: BTreeMap<String, String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn named(name: &str, path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: Some(name.to_string()),
            query: BTreeMap::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Parse `path?key=value&...`, percent-decoding query values.
    pub fn parse(full_path: &str) -> Self {
        let (path, query) = match full_path.split_once('?') {
            Some((path, query)) => (path, query),
            None => (full_path, ""),
        };
        let path = if path.is_empty() { "/" } else { path };

        let mut location = Self::new(path);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            location.query.insert(decode(key), decode(value));
        }
        location
    }

    /// Path plus encoded query string, as used for the route intent.
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    match urlencoding::decode(&s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s,
    }
}
