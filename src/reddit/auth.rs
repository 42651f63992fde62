use super::types::TokenResponse;
use crate::config::Credentials;
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tokens are refreshed this long before reddit says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// OAuth2 password-grant login for a script-type reddit app.
pub struct RedditAuth {
    client: Client,
    credentials: Credentials,
    auth_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditAuth {
    pub fn new(client: Client, credentials: Credentials, auth_base: &str) -> Self {
        Self {
            client,
            credentials,
            auth_base: auth_base.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        }
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Return a valid bearer token, fetching a new one if the cached one is stale.
    pub async fn bearer(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(ref cached) = *guard {
            if Instant::now() < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let token = fresh.access_token.clone();
        *guard = Some(fresh);
        Ok(token)
    }

    /// Drop the cached token so the next call logs in again.
    pub async fn invalidate(&self) {
        *self.token.lock().await = None;
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let url = format!("{}/api/v1/access_token", self.auth_base);
        let form = [
            ("grant_type", "password"),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&form)
            .send()
            .await
            .context("token request failed")?;
        let status = resp.status();
        if status.as_u16() == 401 {
            anyhow::bail!(
                "Authentication failed (401 Unauthorized).\n\
                 Check REDDIT_CLIENT_ID / REDDIT_CLIENT_SECRET belong to a script app."
            );
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("token request failed ({}): {}", status, body);
        }

        // reddit answers a wrong password with 200 and an error field
        let parsed: TokenResponse = resp.json().await.context("failed to parse token response")?;
        if let Some(err) = parsed.error {
            anyhow::bail!("token request rejected: {}", err);
        }
        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .context("token response missing access_token")?;
        let lifetime = Duration::from_secs(parsed.expires_in.unwrap_or(3600));

        tracing::debug!(user = %self.credentials.username, expires_in_s = lifetime.as_secs(), "obtained reddit token");

        Ok(CachedToken {
            access_token,
            expires_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        })
    }
}
