use crate::forum::ForumClient;
use crate::store::KvStore;
use anyhow::{Context, Result};

/// Store key holding the id of the announcement believed to be pinned.
pub const LAST_ANNOUNCEMENT_KEY: &str = "last_announcement_id";

pub async fn load_last_announcement(store: &dyn KvStore) -> Result<Option<String>> {
    let id = store
        .get(LAST_ANNOUNCEMENT_KEY)
        .await
        .context("failed to read rotation state")?;
    Ok(id.filter(|id| !id.is_empty()))
}

pub async fn save_last_announcement(store: &dyn KvStore, id: &str) -> Result<()> {
    store
        .set(LAST_ANNOUNCEMENT_KEY, id)
        .await
        .context("failed to write rotation state")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnpinOutcome {
    /// First run, nothing to unpin.
    NoPrevious,
    /// The stored id is the announcement just published; it stays pinned.
    AlreadyCurrent,
    Unpinned,
    /// The previous announcement no longer resolves.
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationOutcome {
    pub unpin: UnpinOutcome,
    pub pinned: bool,
}

/// Unpin yesterday's announcement (if it still exists) and pin the new one.
///
/// Never fails: remote errors are logged and recorded in the outcome. Pin
/// state is not verified afterwards.
pub async fn rotate(forum: &dyn ForumClient, previous: Option<&str>, new_id: &str) -> RotationOutcome {
    let unpin = match previous {
        None => UnpinOutcome::NoPrevious,
        Some(old) if old == new_id => {
            tracing::warn!(post_id = %old, "stored announcement is the new one, not unpinning it");
            UnpinOutcome::AlreadyCurrent
        }
        Some(old) => unpin_previous(forum, old).await,
    };

    let pinned = match forum.set_sticky(new_id, true).await {
        Ok(()) => {
            tracing::info!(post_id = %new_id, "stickied the new announcement post");
            true
        }
        Err(e) => {
            tracing::error!(post_id = %new_id, error = %format!("{:#}", e), "failed to sticky new announcement");
            false
        }
    };

    RotationOutcome { unpin, pinned }
}

async fn unpin_previous(forum: &dyn ForumClient, old: &str) -> UnpinOutcome {
    match forum.fetch_post(old).await {
        Ok(Some(_)) => {
            tracing::info!(post_id = %old, "got the old announcement post");
        }
        Ok(None) => {
            tracing::error!(post_id = %old, "unable to get the last announcement post to unsticky it, skipping");
            return UnpinOutcome::NotFound;
        }
        Err(e) => {
            let msg = format!("{:#}", e);
            tracing::error!(post_id = %old, error = %msg, "failed to look up the last announcement post");
            return UnpinOutcome::Failed(msg);
        }
    }

    match forum.set_sticky(old, false).await {
        Ok(()) => {
            tracing::info!(post_id = %old, "unstickied the old announcement post");
            UnpinOutcome::Unpinned
        }
        Err(e) => {
            let msg = format!("{:#}", e);
            tracing::error!(post_id = %old, error = %msg, "failed to unsticky old announcement");
            UnpinOutcome::Failed(msg)
        }
    }
}
