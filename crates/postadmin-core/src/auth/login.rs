use serde::Deserialize;
use tracing::info;

use crate::api::{RequestClient, RequestDescriptor, RequestError};

/// Token endpoint (OAuth2 password flow, form-encoded)
pub const TOKEN_PATH: &str = "/auth/token";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Exchange credentials for a bearer token.
///
/// The token is returned, not stored; storing it and returning the user to
/// their route intent is the router's job. Bad credentials come back as
/// [`RequestError::Unauthorized`] like any other 401.
pub async fn authenticate(
    client: &RequestClient,
    username: &str,
    password: &str,
) -> Result<TokenResponse, RequestError> {
    let descriptor = RequestDescriptor::post(TOKEN_PATH).with_form(vec![
        ("username".to_string(), username.to_string()),
        ("password".to_string(), password.to_string()),
    ]);
    let token: TokenResponse = client.issue_json(descriptor).await?;
    info!(username, "Authenticated");
    Ok(token)
}
