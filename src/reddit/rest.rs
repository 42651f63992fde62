use super::auth::RedditAuth;
use super::types::*;
use crate::config::RedditConfig;
use crate::engine::exemption::is_moderator;
use crate::forum::types::Post;
use crate::forum::ForumClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// reddit caps a single listing page at 100 items.
const MAX_PAGE_SIZE: usize = 100;

/// Build the shared HTTP client. reddit throttles requests without a
/// descriptive User-Agent, so one is mandatory.
pub fn build_client(user_agent: &str, timeout_ms: u64) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_millis(timeout_ms))
        .pool_max_idle_per_host(4)
        .build()
        .context("failed to build HTTP client")
}

pub struct RedditRest {
    client: Client,
    auth: Arc<RedditAuth>,
    base_url: String,
    subreddit: String,
    top_limit: usize,
}

impl RedditRest {
    pub fn new(client: Client, auth: Arc<RedditAuth>, config: &RedditConfig, subreddit: &str) -> Self {
        Self {
            client,
            auth,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            subreddit: subreddit.to_string(),
            top_limit: config.top_limit,
        }
    }

    /// Pre-flight check: log in and confirm the account can see the subreddit's mod list.
    pub async fn preflight_auth_check(&self) -> Result<String> {
        let name = self.me().await.context("reddit login failed")?;
        let mods = self.moderators().await.context("could not list moderators")?;
        if !is_moderator(&mods, &name) {
            tracing::warn!(
                user = %name,
                subreddit = %self.subreddit,
                "bot account is not a moderator; bans, stickies and flairs will fail"
            );
        }
        Ok(name)
    }

    async fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.auth.bearer().await?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Map a non-success status to an error, dropping a rejected token.
    async fn check(&self, resp: Response, what: &str) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.auth.invalidate().await;
        }
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("{} failed ({}): {}", what, status, body);
    }

    /// Authenticated GET request.
    async fn get_authed<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .authed(Method::GET, path)
            .await?
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        let resp = self.check(resp, &format!("GET {}", path)).await?;
        resp.json().await.context("failed to parse response")
    }

    /// Authenticated form POST against an `api_type=json` endpoint.
    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let mut fields: Vec<(&str, &str)> = vec![("api_type", "json")];
        fields.extend_from_slice(form);

        let resp = self
            .authed(Method::POST, path)
            .await?
            .form(&fields)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        let resp = self.check(resp, &format!("POST {}", path)).await?;
        let parsed: ApiResponse<T> = resp.json().await.context("failed to parse response")?;
        if !parsed.json.errors.is_empty() {
            anyhow::bail!(
                "POST {} rejected: {}",
                path,
                serde_json::Value::Array(parsed.json.errors)
            );
        }
        Ok(parsed.json.data)
    }
}

#[async_trait]
impl ForumClient for RedditRest {
    /// Fetch the day's top listing. Paginates until `top_limit` posts or the end.
    async fn top_posts_today(&self) -> Result<Vec<Post>> {
        let mut all_posts = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page_size = (self.top_limit - all_posts.len()).min(MAX_PAGE_SIZE);
            let mut path = format!(
                "/r/{}/top?t=day&limit={}&raw_json=1",
                self.subreddit, page_size
            );
            if let Some(ref a) = after {
                path.push_str(&format!("&after={}", a));
            }

            let listing: Listing<Link> = self.get_authed(&path).await?;
            let done = listing.data.children.is_empty()
                || listing.data.after.as_deref().is_none_or(|a| a.is_empty());
            all_posts.extend(listing.data.children.into_iter().map(|t| Post::from(t.data)));
            if done || all_posts.len() >= self.top_limit {
                break;
            }
            after = listing.data.after;
        }

        all_posts.truncate(self.top_limit);
        Ok(all_posts)
    }

    async fn submit_post(&self, title: &str, body: &str, flair_id: Option<&str>) -> Result<String> {
        let mut form = vec![
            ("sr", self.subreddit.as_str()),
            ("kind", "self"),
            ("title", title),
            ("text", body),
            ("resubmit", "true"),
        ];
        if let Some(flair) = flair_id {
            form.push(("flair_id", flair));
        }
        let data: Option<SubmitData> = self.post_form("/api/submit", &form).await?;
        let data = data.context("submit response missing data")?;
        Ok(data.id)
    }

    async fn fetch_post(&self, id: &str) -> Result<Option<Post>> {
        let path = format!("/by_id/t3_{}?raw_json=1", id);
        let resp = self
            .authed(Method::GET, &path)
            .await?
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = self.check(resp, &format!("GET {}", path)).await?;
        let listing: Listing<Link> = resp.json().await.context("failed to parse post")?;
        Ok(listing.data.children.into_iter().next().map(|t| Post::from(t.data)))
    }

    async fn edit_post(&self, id: &str, body: &str) -> Result<()> {
        let thing_id = format!("t3_{}", id);
        self.post_form::<serde_json::Value>(
            "/api/editusertext",
            &[("thing_id", thing_id.as_str()), ("text", body)],
        )
        .await?;
        Ok(())
    }

    async fn set_sticky(&self, id: &str, sticky: bool) -> Result<()> {
        let thing_id = format!("t3_{}", id);
        let mut form = vec![
            ("id", thing_id.as_str()),
            ("state", if sticky { "true" } else { "false" }),
        ];
        if sticky {
            form.push(("num", "1"));
        }
        self.post_form::<serde_json::Value>("/api/set_subreddit_sticky", &form)
            .await?;
        Ok(())
    }

    async fn set_flair(&self, id: &str, template_id: &str) -> Result<()> {
        let path = format!("/r/{}/api/selectflair", self.subreddit);
        let link = format!("t3_{}", id);
        self.post_form::<serde_json::Value>(
            &path,
            &[("link", link.as_str()), ("flair_template_id", template_id)],
        )
        .await?;
        Ok(())
    }

    async fn moderators(&self) -> Result<Vec<String>> {
        let path = format!("/r/{}/about/moderators?raw_json=1", self.subreddit);
        let list: ModeratorList = self.get_authed(&path).await?;
        Ok(list.data.children.into_iter().map(|m| m.name).collect())
    }

    async fn ban_user(&self, username: &str, reason: &str) -> Result<()> {
        let path = format!("/r/{}/api/friend", self.subreddit);
        self.post_form::<serde_json::Value>(
            &path,
            &[("type", "banned"), ("name", username), ("ban_reason", reason)],
        )
        .await?;
        Ok(())
    }

    async fn me(&self) -> Result<String> {
        let me: Me = self.get_authed("/api/v1/me").await?;
        Ok(me.name)
    }
}
