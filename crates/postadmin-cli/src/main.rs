//! postadmin - console front-end for the post administration API.
//!
//! Plays the part of the admin application's shell: pages are opened
//! through the guarded router, data is fetched through the request client,
//! and expired sessions send the console back to the login prompt.

mod shell;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use postadmin_core::api::{AssistMode, AssistRequest, AssistStatus};
use postadmin_core::auth::authenticate;
use postadmin_core::config::{Config, SESSION_EXPIRED_REDIRECT_DELAY};
use postadmin_core::router::{RouteTable, LOGIN_PATH};
use postadmin_core::{
    FileSessionStore, KeyringSessionStore, Location, RequestClient, RequestError, Router, SessionStore,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shell::ConsoleNotifier;

/// Set to use the OS keychain instead of the session file
const KEYCHAIN_ENV: &str = "POSTADMIN_KEYCHAIN";

const USAGE: &str = "\
Usage: postadmin <command> [args]

Commands:
  open <path>            Open a page (/users, /posts, /stats), logging in if needed
  login                  Log in and open the landing page
  logout                 Forget the stored session
  status                 Show whether a session is stored
  get <path>             GET an API path and print the JSON
  delete <path>          DELETE an API path
  ask <mode> <text...>   Run the AI assistant (summary, reply, tags, polish, ...)";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

struct Console {
    config: Config,
    session: Arc<dyn SessionStore>,
    router: Arc<Router>,
    client: RequestClient,
}

impl Console {
    fn new() -> Result<Self> {
        let mut config = Config::load().context("Failed to load config")?;
        config.apply_env_overrides();

        let session: Arc<dyn SessionStore> = if std::env::var_os(KEYCHAIN_ENV).is_some() {
            Arc::new(KeyringSessionStore::new()?)
        } else {
            Arc::new(FileSessionStore::new(config.cache_dir()?))
        };

        let router = Arc::new(Router::new(RouteTable::admin(), Arc::clone(&session)));
        let client = RequestClient::new(
            &config,
            Arc::clone(&session),
            Arc::new(ConsoleNotifier),
            router.clone(),
        )?;

        Ok(Self {
            config,
            session,
            router,
            client,
        })
    }

    /// Open a page. Landing on the login page prompts for credentials and
    /// then follows the route intent.
    async fn open(&mut self, path: &str) -> Result<()> {
        let mut location = self.router.push(path)?;
        if location.path == LOGIN_PATH {
            location = self.login().await?;
        }
        println!("# {}", location);
        self.show_page(&location).await
    }

    async fn login(&mut self) -> Result<Location> {
        if self.router.current().path != LOGIN_PATH {
            self.router.push(LOGIN_PATH)?;
        }
        if let Some(intent) = self.router.route_intent() {
            eprintln!("Login required to open {}", intent);
        }

        let username = prompt_username(self.config.last_username.as_deref())?;
        let password = rpassword::prompt_password("Password: ")?;

        let token = match authenticate(&self.client, &username, &password).await {
            Ok(token) => token,
            Err(e) => {
                if let Some(detail) = e.response().and_then(|r| r.detail()) {
                    anyhow::bail!("Login failed: {}", detail);
                }
                return Err(e.into());
            }
        };

        self.config.last_username = Some(username);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        let location = self.router.complete_login(&token.access_token)?;
        info!(to = %location, "Login complete");
        Ok(location)
    }

    async fn show_page(&self, location: &Location) -> Result<()> {
        let endpoint = match location.name.as_deref() {
            Some("users") => "/users",
            Some("posts") => "/posts",
            Some("stats") => "/stats/dashboard",
            _ => return Ok(()),
        };
        let params: Value = location
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>()
            .into();
        let body = self.call(self.client.get(endpoint, params)).await?;
        print_json(&body)
    }

    /// Await an API call, reporting failures through [`Console::fail`].
    async fn call<F>(&self, request: F) -> Result<Value>
    where
        F: std::future::Future<Output = Result<Value, RequestError>>,
    {
        match request.await {
            Ok(body) => Ok(body),
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// On a 401 wait out the redirect so the console reports where the
    /// application ended up.
    async fn fail(&self, e: RequestError) -> anyhow::Error {
        if e.is_unauthorized() {
            tokio::time::sleep(SESSION_EXPIRED_REDIRECT_DELAY + Duration::from_millis(50)).await;
            eprintln!("# {}", self.router.current());
        }
        e.into()
    }

    async fn ask(&self, mode: &str, content: &str) -> Result<()> {
        let mode: AssistMode = mode.parse().map_err(anyhow::Error::msg)?;
        let response = self
            .client
            .ask_assistant(&AssistRequest::new(content).with_mode(mode))
            .await;
        let response = match response {
            Ok(r) => r,
            Err(e) => return Err(self.fail(e).await),
        };

        match response.status {
            AssistStatus::Sensitive => println!("Content was flagged as sensitive."),
            AssistStatus::Error => println!("The assistant could not process this request."),
            AssistStatus::Ok => {
                if let Some(summary) = &response.summary {
                    println!("{}", summary);
                }
                if let Some(translated) = &response.translated_content {
                    println!("{}", translated);
                }
                for suggestion in &response.suggestions {
                    println!("- {}", suggestion);
                }
                if !response.tags.is_empty() {
                    println!("tags: {}", response.tags.join(", "));
                }
                if let Some(vibe) = &response.vibe {
                    print_json(vibe)?;
                }
            }
        }
        Ok(())
    }
}

fn prompt_username(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Username [{}]: ", last),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    match (input.is_empty(), last) {
        (true, Some(last)) => Ok(last.to_string()),
        (true, None) => anyhow::bail!("Username is required"),
        (false, _) => Ok(input.to_string()),
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let mut console = Console::new()?;
    info!(base_url = console.client.base_url(), command = %command, "postadmin starting");

    match (command.as_str(), &args[1..]) {
        ("open", [path]) => console.open(path).await?,
        ("login", []) => {
            let location = console.login().await?;
            println!("# {}", location);
        }
        ("logout", []) => {
            let location = console.router.logout()?;
            println!("# {}", location);
        }
        ("status", []) => {
            let state = if console.session.is_authenticated() {
                "logged in"
            } else {
                "logged out"
            };
            println!("{} ({})", state, console.client.base_url());
        }
        ("get", [path]) => {
            let body = console.call(console.client.get(path, json!({}))).await?;
            print_json(&body)?;
        }
        ("delete", [path]) => {
            let body = console.call(console.client.del(path, json!({}))).await?;
            if !body.is_null() {
                print_json(&body)?;
            }
        }
        ("ask", [mode, text @ ..]) if !text.is_empty() => {
            console.ask(mode, &text.join(" ")).await?;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
