use crate::forum::types::Post;
use serde::Deserialize;

/// Placeholder reddit puts in `author` once an account is gone.
const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
}

/// Generic `{"kind": "Listing", "data": {...}}` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<Thing<T>>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    #[serde(default)]
    #[allow(dead_code)]
    pub kind: String,
    pub data: T,
}

/// A `t3` thing: one submission.
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_flair_text: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub selftext: String,
}

impl From<Link> for Post {
    fn from(link: Link) -> Self {
        Post {
            id: link.id,
            author_name: link.author.filter(|a| a != DELETED_AUTHOR && !a.is_empty()),
            author_flair_text: link.author_flair_text,
            score: link.score,
            permalink: link.permalink,
            body: link.selftext,
        }
    }
}

/// `GET /r/{sr}/about/moderators`
#[derive(Debug, Clone, Deserialize)]
pub struct ModeratorList {
    pub data: ModeratorListData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModeratorListData {
    pub children: Vec<Moderator>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Moderator {
    pub name: String,
}

/// `GET /api/v1/me`
#[derive(Debug, Clone, Deserialize)]
pub struct Me {
    pub name: String,
}

/// Envelope of `api_type=json` POST endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub json: ApiJson<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiJson<T> {
    /// Each entry is `[code, message, field]`.
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitData {
    pub id: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub url: Option<String>,
}
