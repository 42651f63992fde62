pub mod dry_run;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::Post;

/// Everything the daily run needs from the remote forum.
///
/// Post ids are bare ids (no `t3_` kind prefix). Implementations report a
/// deleted or unknown post as `Ok(None)` from [`ForumClient::fetch_post`],
/// never as an error.
#[async_trait]
pub trait ForumClient: Send + Sync {
    /// Top-scoring posts of the last 24 hours, in the forum's own order.
    async fn top_posts_today(&self) -> Result<Vec<Post>>;
    /// Submit a self post and return the new post's id.
    async fn submit_post(&self, title: &str, body: &str, flair_id: Option<&str>) -> Result<String>;
    async fn fetch_post(&self, id: &str) -> Result<Option<Post>>;
    async fn edit_post(&self, id: &str, body: &str) -> Result<()>;
    async fn set_sticky(&self, id: &str, sticky: bool) -> Result<()>;
    async fn set_flair(&self, id: &str, template_id: &str) -> Result<()>;
    async fn moderators(&self) -> Result<Vec<String>>;
    async fn ban_user(&self, username: &str, reason: &str) -> Result<()>;
    /// Name of the account the client acts as.
    async fn me(&self) -> Result<String>;
}
