//! Client-credentials token exchange.

use reqwest::Method;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, Auth, Transport};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Exchange the configured API key/secret for a bearer token.
///
/// Called once per process; there is no refresh.
///
/// # Errors
///
/// - `ClientError::Transport` if the token endpoint is unreachable.
/// - `ClientError::Auth` on a non-2xx status or a body without `access_token`.
pub async fn fetch_token(transport: &dyn Transport, config: &ClientConfig) -> Result<String> {
    let url = format!("{}/oauth/token", config.api_host());

    let response = transport
        .execute(ApiRequest {
            method: Method::POST,
            url,
            auth: Auth::Basic {
                username: config.api_key.clone(),
                password: config.api_secret.clone(),
            },
            body: Some(serde_json::json!({ "grant_type": "client_credentials" })),
        })
        .await?;

    if !response.is_success() {
        return Err(ClientError::Auth(format!(
            "token endpoint returned HTTP {}",
            response.status
        )));
    }

    let token = response
        .json::<TokenResponse>()
        .map_err(|e| ClientError::Auth(format!("malformed token response: {e}")))?
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ClientError::Auth("token response has no access_token".into()))?;

    tracing::info!(
        environment = %config.environment,
        organization = %config.organization,
        "Obtained API token"
    );

    Ok(token)
}
