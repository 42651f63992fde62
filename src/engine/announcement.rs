use super::selector::RankedPair;
use crate::forum::ForumClient;
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Date format used in titles, ban reasons and logs: `dd/mm/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub body: String,
}

/// Build the daily announcement text. Lines end in four spaces so reddit's
/// markdown renders them as hard breaks.
pub fn compose(pair: &RankedPair, date: NaiveDate, mention: &str) -> Announcement {
    let title = format!("Today's ({}) winner and loser!", format_date(date));
    let body = format!(
        "{m}{top} is our unfortunate [winner]({top_link})!    \n\
         {m}{bottom} is our equally as unfortunate [loser]({bottom_link})!    \n\
         Keep the posts coming fellas, you could be added to our hall of winners and losers \
         if you\u{2019}re (un)lucky enough!",
        m = mention,
        top = pair.top.author(),
        top_link = pair.top.permalink,
        bottom = pair.bottom.author(),
        bottom_link = pair.bottom.permalink,
    );
    Announcement { title, body }
}

/// Submit the announcement and return the new post's id.
pub async fn publish(
    forum: &dyn ForumClient,
    announcement: &Announcement,
    flair_id: Option<&str>,
) -> Result<String> {
    let id = forum
        .submit_post(&announcement.title, &announcement.body, flair_id)
        .await
        .context("announcement submission failed")?;
    tracing::info!(post_id = %id, title = %announcement.title, "created new announcement post");
    Ok(id)
}
