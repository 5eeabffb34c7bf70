use anyhow::{Context, Result};
use keyring::Entry;
use tracing::warn;

use super::SessionStore;

const SERVICE_NAME: &str = "postadmin";

/// Keychain account under which the bearer token is stored
const TOKEN_ACCOUNT: &str = "session-token";

/// Session store that keeps the token in the OS keychain.
pub struct KeyringSessionStore {
    entry: Entry,
}

impl KeyringSessionStore {
    pub fn new() -> Result<Self> {
        Self::with_account(TOKEN_ACCOUNT)
    }

    /// Use a custom keychain account, e.g. one per API origin.
    pub fn with_account(account: &str) -> Result<Self> {
        let entry = Entry::new(SERVICE_NAME, account).context("Failed to create keyring entry")?;
        Ok(Self { entry })
    }
}

impl SessionStore for KeyringSessionStore {
    fn get(&self) -> Option<String> {
        match self.entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "Failed to retrieve token from keychain");
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Err(e) = self.entry.set_password(token) {
            warn!(error = %e, "Failed to store token in keychain");
        }
    }

    fn clear(&self) {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => warn!(error = %e, "Failed to delete token from keychain"),
        }
    }
}
