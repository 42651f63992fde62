use super::types::Post;
use super::ForumClient;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Id handed back for announcements that were never actually submitted.
pub const DRY_RUN_POST_ID: &str = "dry-run";

/// Passes reads through to the wrapped client and logs every mutation
/// instead of performing it.
pub struct DryRunForum {
    inner: Arc<dyn ForumClient>,
}

impl DryRunForum {
    pub fn new(inner: Arc<dyn ForumClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ForumClient for DryRunForum {
    async fn top_posts_today(&self) -> Result<Vec<Post>> {
        self.inner.top_posts_today().await
    }

    async fn submit_post(&self, title: &str, body: &str, flair_id: Option<&str>) -> Result<String> {
        tracing::info!(
            title = %title,
            flair_id = flair_id.unwrap_or("-"),
            body_len = body.len(),
            "DRY RUN: would submit post"
        );
        Ok(DRY_RUN_POST_ID.to_string())
    }

    async fn fetch_post(&self, id: &str) -> Result<Option<Post>> {
        if id == DRY_RUN_POST_ID {
            return Ok(None);
        }
        self.inner.fetch_post(id).await
    }

    async fn edit_post(&self, id: &str, body: &str) -> Result<()> {
        tracing::info!(post_id = %id, body_len = body.len(), "DRY RUN: would edit post");
        Ok(())
    }

    async fn set_sticky(&self, id: &str, sticky: bool) -> Result<()> {
        tracing::info!(post_id = %id, sticky, "DRY RUN: would change sticky state");
        Ok(())
    }

    async fn set_flair(&self, id: &str, template_id: &str) -> Result<()> {
        tracing::info!(post_id = %id, template_id = %template_id, "DRY RUN: would set flair");
        Ok(())
    }

    async fn moderators(&self) -> Result<Vec<String>> {
        self.inner.moderators().await
    }

    async fn ban_user(&self, username: &str, reason: &str) -> Result<()> {
        tracing::info!(user = %username, reason = %reason, "DRY RUN: would ban user");
        Ok(())
    }

    async fn me(&self) -> Result<String> {
        self.inner.me().await
    }
}
