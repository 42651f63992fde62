use super::announcement::format_date;
use super::selector::RankedPair;
use crate::forum::ForumClient;
use chrono::NaiveDate;

pub fn winner_ban_reason(date: NaiveDate) -> String {
    format!("Most upvoted post of the day {}", format_date(date))
}

pub fn loser_ban_reason(date: NaiveDate) -> String {
    format!("Least upvoted post of the day {}", format_date(date))
}

/// Ban both authors. The two calls are independent: a failed ban is logged
/// and does not stop the other. Returns the names that were banned.
pub async fn suspend_pair(forum: &dyn ForumClient, pair: &RankedPair, date: NaiveDate) -> Vec<String> {
    let targets = [
        ("winner", pair.top.author(), winner_ban_reason(date)),
        ("loser", pair.bottom.author(), loser_ban_reason(date)),
    ];

    let mut banned = Vec::new();
    for (role, user, reason) in targets {
        match forum.ban_user(user, &reason).await {
            Ok(()) => {
                tracing::info!(role, user = %user, "banned user");
                banned.push(user.to_string());
            }
            Err(e) => tracing::error!(role, user = %user, error = %format!("{:#}", e), "ban failed"),
        }
    }
    banned
}

/// Flair the winning and losing posts with whichever templates are configured.
/// Returns the ids of posts that were flaired.
pub async fn flair_pair(
    forum: &dyn ForumClient,
    pair: &RankedPair,
    winner_template: Option<&str>,
    loser_template: Option<&str>,
) -> Vec<String> {
    let targets = [
        ("winner", pair.top.id.as_str(), winner_template),
        ("loser", pair.bottom.id.as_str(), loser_template),
    ];

    let mut flaired = Vec::new();
    for (role, post_id, template) in targets {
        let Some(template) = template else { continue };
        match forum.set_flair(post_id, template).await {
            Ok(()) => {
                tracing::info!(role, post_id = %post_id, "flaired post");
                flaired.push(post_id.to_string());
            }
            Err(e) => tracing::error!(role, post_id = %post_id, error = %format!("{:#}", e), "flair failed"),
        }
    }
    flaired
}
