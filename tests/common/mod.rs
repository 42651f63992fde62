#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use goldilocks_bot::config::SingleEligiblePolicy;
use goldilocks_bot::forum::types::Post;
use goldilocks_bot::forum::ForumClient;
use goldilocks_bot::RunSettings;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const HOF_ID: &str = "hof";
pub const BOT_NAME: &str = "goldibot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    TopPosts,
    Submit { title: String, body: String, flair_id: Option<String> },
    Fetch(String),
    Edit { id: String, body: String },
    Sticky { id: String, sticky: bool },
    Flair { id: String, template: String },
    Moderators,
    Ban { user: String, reason: String },
    Me,
}

impl Call {
    /// True for calls that change something on the forum.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Submit { .. } | Call::Edit { .. } | Call::Sticky { .. } | Call::Flair { .. } | Call::Ban { .. }
        )
    }
}

/// In-memory forum that records every call and fails on demand.
pub struct FakeForum {
    posts: Mutex<Vec<Post>>,
    moderators: Vec<String>,
    /// Posts resolvable through `fetch_post`, by id.
    existing: Mutex<HashMap<String, Post>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashSet<String>>,
    next_id: Mutex<u32>,
}

impl FakeForum {
    pub fn new(posts: Vec<Post>, moderators: &[&str]) -> Self {
        let forum = Self {
            posts: Mutex::new(posts),
            moderators: moderators.iter().map(|m| m.to_string()).collect(),
            existing: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashSet::new()),
            next_id: Mutex::new(0),
        };
        forum.add_existing(self_post(HOF_ID, BOT_NAME, "# Hall of winners and losers"));
        forum
    }

    pub fn add_existing(&self, post: Post) {
        self.existing.lock().unwrap().insert(post.id.clone(), post);
    }

    pub fn remove_existing(&self, id: &str) {
        self.existing.lock().unwrap().remove(id);
    }

    pub fn set_posts(&self, posts: Vec<Post>) {
        *self.posts.lock().unwrap() = posts;
    }

    /// Make an operation fail. Keys: "submit", "edit", "fetch:<id>",
    /// "sticky:<id>", "flair:<id>", "ban:<user>".
    pub fn fail(&self, key: &str) {
        self.failures.lock().unwrap().insert(key.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn body_of(&self, id: &str) -> Option<String> {
        self.existing.lock().unwrap().get(id).map(|p| p.body.clone())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.failures.lock().unwrap().contains(key) {
            anyhow::bail!("injected failure: {}", key);
        }
        Ok(())
    }
}

#[async_trait]
impl ForumClient for FakeForum {
    async fn top_posts_today(&self) -> Result<Vec<Post>> {
        self.record(Call::TopPosts);
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn submit_post(&self, title: &str, body: &str, flair_id: Option<&str>) -> Result<String> {
        self.record(Call::Submit {
            title: title.to_string(),
            body: body.to_string(),
            flair_id: flair_id.map(str::to_string),
        });
        self.check("submit")?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("ann{}", *next)
        };
        self.add_existing(self_post(&id, BOT_NAME, body));
        Ok(id)
    }

    async fn fetch_post(&self, id: &str) -> Result<Option<Post>> {
        self.record(Call::Fetch(id.to_string()));
        self.check(&format!("fetch:{}", id))?;
        Ok(self.existing.lock().unwrap().get(id).cloned())
    }

    async fn edit_post(&self, id: &str, body: &str) -> Result<()> {
        self.record(Call::Edit { id: id.to_string(), body: body.to_string() });
        self.check("edit")?;
        let mut existing = self.existing.lock().unwrap();
        match existing.get_mut(id) {
            Some(post) => {
                post.body = body.to_string();
                Ok(())
            }
            None => anyhow::bail!("no such post {}", id),
        }
    }

    async fn set_sticky(&self, id: &str, sticky: bool) -> Result<()> {
        self.record(Call::Sticky { id: id.to_string(), sticky });
        self.check(&format!("sticky:{}", id))
    }

    async fn set_flair(&self, id: &str, template_id: &str) -> Result<()> {
        self.record(Call::Flair { id: id.to_string(), template: template_id.to_string() });
        self.check(&format!("flair:{}", id))
    }

    async fn moderators(&self) -> Result<Vec<String>> {
        self.record(Call::Moderators);
        Ok(self.moderators.clone())
    }

    async fn ban_user(&self, username: &str, reason: &str) -> Result<()> {
        self.record(Call::Ban { user: username.to_string(), reason: reason.to_string() });
        self.check(&format!("ban:{}", username))
    }

    async fn me(&self) -> Result<String> {
        self.record(Call::Me);
        Ok(BOT_NAME.to_string())
    }
}

pub fn post(id: &str, score: i64, author: &str) -> Post {
    Post {
        id: id.to_string(),
        author_name: Some(author.to_string()),
        author_flair_text: None,
        score,
        permalink: format!("/r/TheGoldilocksZone/comments/{}/", id),
        body: String::new(),
    }
}

pub fn self_post(id: &str, author: &str, body: &str) -> Post {
    Post { body: body.to_string(), ..post(id, 1, author) }
}

pub fn settings() -> RunSettings {
    RunSettings {
        ban_users: false,
        sticky_announcement: true,
        user_mention: "u/".to_string(),
        exempt_flair_text: "Exempt".to_string(),
        single_eligible: SingleEligiblePolicy::SelfPair,
        announcement_flair_id: Some("announce-flair".to_string()),
        winner_template_id: None,
        loser_template_id: None,
        hall_of_fame_id: HOF_ID.to_string(),
    }
}
