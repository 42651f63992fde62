/// Normalized snapshot of one submission (provider-agnostic).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    /// `None` when the account was deleted.
    pub author_name: Option<String>,
    pub author_flair_text: Option<String>,
    pub score: i64,
    pub permalink: String,
    /// Self-text body; empty for link posts.
    pub body: String,
}

impl Post {
    pub fn author(&self) -> &str {
        self.author_name.as_deref().unwrap_or("[deleted]")
    }
}
