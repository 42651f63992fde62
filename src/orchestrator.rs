use crate::config::{Config, SingleEligiblePolicy};
use crate::engine::announcement::{self, format_date};
use crate::engine::rotation::{self, RotationOutcome};
use crate::engine::{hall_of_fame, moderation, select, ExemptionFilter, RankedPair, SelectError};
use crate::forum::ForumClient;
use crate::store::KvStore;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;

/// Immutable per-run settings, resolved once from [`Config`].
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub ban_users: bool,
    pub sticky_announcement: bool,
    pub user_mention: String,
    pub exempt_flair_text: String,
    pub single_eligible: SingleEligiblePolicy,
    pub announcement_flair_id: Option<String>,
    pub winner_template_id: Option<String>,
    pub loser_template_id: Option<String>,
    pub hall_of_fame_id: String,
}

impl From<&Config> for RunSettings {
    fn from(config: &Config) -> Self {
        Self {
            ban_users: config.moderation.ban_users,
            sticky_announcement: config.moderation.sticky_announcement,
            user_mention: config.moderation.user_mention.clone(),
            exempt_flair_text: config.moderation.exempt_flair_text.clone(),
            single_eligible: config.moderation.single_eligible,
            announcement_flair_id: config.flair.announcement_flair_id.clone(),
            winner_template_id: config.flair.winner_template_id.clone(),
            loser_template_id: config.flair.loser_template_id.clone(),
            hall_of_fame_id: config.hall_of_fame.submission_id.clone(),
        }
    }
}

/// Phases of one run, in order. `Skipped` and `Done` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Fetching,
    Selecting,
    Skipped,
    Proceeding,
    Publishing,
    Rotating,
    Logging,
    Done,
}

/// What a completed run did. Sub-steps after publishing are best-effort,
/// so each records whether it went through.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub pair: RankedPair,
    pub announcement_id: String,
    pub banned: Vec<String>,
    pub flaired: Vec<String>,
    /// `None` when stickying is disabled.
    pub rotation: Option<RotationOutcome>,
    pub state_saved: bool,
    pub hall_of_fame_updated: bool,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No eligible pair today. Nothing was changed on the forum.
    Skipped(SelectError),
    Completed(RunReport),
}

/// Sequences one daily pass: fetch, select, moderate, publish, rotate, log.
///
/// Anything failing before the announcement is published aborts the run with
/// an error. Once published, the run always finishes; later failures are
/// logged and reported but never roll anything back.
pub struct RunOrchestrator {
    forum: Arc<dyn ForumClient>,
    store: Arc<dyn KvStore>,
    settings: RunSettings,
}

impl RunOrchestrator {
    pub fn new(forum: Arc<dyn ForumClient>, store: Arc<dyn KvStore>, settings: RunSettings) -> Self {
        Self { forum, store, settings }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub async fn run(&self, date: NaiveDate) -> Result<RunOutcome> {
        let forum = self.forum.as_ref();
        let settings = &self.settings;
        tracing::info!(date = %format_date(date), "starting daily run");

        enter(RunPhase::Fetching);
        let previous = rotation::load_last_announcement(self.store.as_ref()).await?;
        let posts = forum.top_posts_today().await.context("failed to list today's posts")?;
        tracing::info!(count = posts.len(), "got post list for today");
        let moderators = forum.moderators().await.context("failed to list moderators")?;
        let bot_name = forum.me().await.context("failed to resolve bot account name")?;
        let filter = ExemptionFilter::new(moderators, bot_name, settings.exempt_flair_text.clone());

        enter(RunPhase::Selecting);
        let pair = match select(&posts, &filter, settings.single_eligible) {
            Ok(pair) => pair,
            Err(e) => {
                enter(RunPhase::Skipped);
                tracing::warn!(
                    reason = %e,
                    moderators = filter.moderator_count(),
                    "no eligible posts today, skipping run"
                );
                return Ok(RunOutcome::Skipped(e));
            }
        };
        tracing::info!(post_id = %pair.top.id, author = %pair.top.author(), score = pair.top.score, "got top post");
        tracing::info!(post_id = %pair.bottom.id, author = %pair.bottom.author(), score = pair.bottom.score, "got bottom post");
        if pair.is_self_pair() {
            tracing::warn!(post_id = %pair.top.id, "only one eligible post today, it is both winner and loser");
        }

        enter(RunPhase::Proceeding);
        let banned = if settings.ban_users {
            moderation::suspend_pair(forum, &pair, date).await
        } else {
            Vec::new()
        };
        let flaired = moderation::flair_pair(
            forum,
            &pair,
            settings.winner_template_id.as_deref(),
            settings.loser_template_id.as_deref(),
        )
        .await;

        enter(RunPhase::Publishing);
        let text = announcement::compose(&pair, date, &settings.user_mention);
        let announcement_id =
            announcement::publish(forum, &text, settings.announcement_flair_id.as_deref()).await?;

        enter(RunPhase::Rotating);
        let rotation = if settings.sticky_announcement {
            Some(rotation::rotate(forum, previous.as_deref(), &announcement_id).await)
        } else {
            None
        };
        // committed even if the rotation calls failed
        let state_saved =
            match rotation::save_last_announcement(self.store.as_ref(), &announcement_id).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(error = %format!("{:#}", e), "failed to persist rotation state");
                    false
                }
            };

        enter(RunPhase::Logging);
        let hall_of_fame_updated = match hall_of_fame::append(
            forum,
            &settings.hall_of_fame_id,
            &pair,
            &settings.user_mention,
        )
        .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "failed to update hall of fame");
                false
            }
        };

        enter(RunPhase::Done);
        Ok(RunOutcome::Completed(RunReport {
            pair,
            announcement_id,
            banned,
            flaired,
            rotation,
            state_saved,
            hall_of_fame_updated,
        }))
    }
}

fn enter(phase: RunPhase) {
    tracing::debug!(phase = ?phase, "run phase");
}
