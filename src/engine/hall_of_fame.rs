use super::selector::RankedPair;
use crate::forum::ForumClient;
use anyhow::{Context, Result};

/// One log block: a leading hard break, then one line per author.
pub fn format_entry(pair: &RankedPair, mention: &str) -> String {
    format!(
        "    \n{m}{top} : [post]({top_link})    \n{m}{bottom} : [post]({bottom_link})",
        m = mention,
        top = pair.top.author(),
        top_link = pair.top.permalink,
        bottom = pair.bottom.author(),
        bottom_link = pair.bottom.permalink,
    )
}

/// The existing body is kept byte-for-byte; entries only ever go on the end.
pub fn append_entry(body: &str, entry: &str) -> String {
    let mut out = String::with_capacity(body.len() + entry.len());
    out.push_str(body);
    out.push_str(entry);
    out
}

/// Read the log post, append the pair, write the whole body back.
///
/// Not atomic: an edit made by anyone else between the read and the write is
/// lost. Only one run per day is expected to write.
pub async fn append(forum: &dyn ForumClient, log_post_id: &str, pair: &RankedPair, mention: &str) -> Result<()> {
    let log_post = forum
        .fetch_post(log_post_id)
        .await
        .context("failed to fetch hall of fame post")?
        .with_context(|| format!("hall of fame post {} not found", log_post_id))?;
    tracing::info!(post_id = %log_post_id, body_len = log_post.body.len(), "got old hall of fame post");

    let new_body = append_entry(&log_post.body, &format_entry(pair, mention));
    forum
        .edit_post(log_post_id, &new_body)
        .await
        .context("failed to edit hall of fame post")?;
    tracing::info!(post_id = %log_post_id, "edited hall of fame post successfully");
    Ok(())
}
