use anyhow::Result;
use goldilocks_bot::config::Config;
use goldilocks_bot::engine::rotation::{self, LAST_ANNOUNCEMENT_KEY};
use goldilocks_bot::forum::dry_run::DryRunForum;
use goldilocks_bot::forum::ForumClient;
use goldilocks_bot::reddit::{auth::RedditAuth, rest};
use goldilocks_bot::store::{FileKvStore, KvStore, MemoryKvStore};
use goldilocks_bot::{schedule, RunOrchestrator, RunOutcome, RunSettings};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";

/// Command line flags.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    config_path: PathBuf,
    /// Run a single pass and exit.
    once: bool,
    /// Log forum mutations instead of performing them.
    dry_run: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args {
            config_path: PathBuf::from(DEFAULT_CONFIG),
            once: false,
            dry_run: false,
        };
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--once" => parsed.once = true,
                "--dry-run" => parsed.dry_run = true,
                "--config" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                    parsed.config_path = PathBuf::from(path);
                }
                other => anyhow::bail!("unknown argument: {}", other),
            }
        }
        Ok(parsed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("goldilocks_bot=info")),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    let mut config = Config::load(&args.config_path)?;

    // Load saved credentials from .env (real env vars take precedence)
    Config::load_env_file();
    config.apply_env_overrides();
    let credentials = Config::credentials()?;

    let client = rest::build_client(&config.subreddit.user_agent, config.reddit.request_timeout_ms)?;
    let auth = Arc::new(RedditAuth::new(client.clone(), credentials, &config.reddit.auth_base));
    let reddit = rest::RedditRest::new(client, auth.clone(), &config.reddit, &config.subreddit.name);

    tracing::info!(user = %auth.username(), subreddit = %config.subreddit.name, "logging in");
    let bot_name = reddit.preflight_auth_check().await?;
    tracing::info!(user = %bot_name, "logged in");

    let file_store = FileKvStore::new(&config.state.path);
    let (forum, store): (Arc<dyn ForumClient>, Arc<dyn KvStore>) = if args.dry_run {
        tracing::warn!("DRY RUN: no posts, bans, flairs or state will be written");
        let seeded = match rotation::load_last_announcement(&file_store).await? {
            Some(id) => MemoryKvStore::with_value(LAST_ANNOUNCEMENT_KEY, &id),
            None => MemoryKvStore::new(),
        };
        (Arc::new(DryRunForum::new(Arc::new(reddit))), Arc::new(seeded))
    } else {
        tracing::debug!(path = %file_store.path().display(), "using state file");
        (Arc::new(reddit), Arc::new(file_store))
    };

    let orchestrator = RunOrchestrator::new(forum, store, RunSettings::from(&config));
    tracing::info!(
        ban_users = orchestrator.settings().ban_users,
        sticky = orchestrator.settings().sticky_announcement,
        run_hour_utc = config.schedule.run_hour_utc,
        "bot ready"
    );

    let mut run_now = config.schedule.run_on_start || args.once;
    loop {
        // Wait until it's time to run each day
        if run_now {
            run_now = false;
        } else {
            let wait = schedule::time_till_next_run(chrono::Utc::now(), config.schedule.run_hour_utc);
            tracing::info!(wait_s = wait.as_secs(), "sleeping until next run");
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted, shutting down");
                    return Ok(());
                }
            }
        }

        let date = chrono::Utc::now().date_naive();
        match orchestrator.run(date).await {
            Ok(RunOutcome::Completed(report)) => tracing::info!(
                announcement = %report.announcement_id,
                top = %report.pair.top.id,
                bottom = %report.pair.bottom.id,
                banned = report.banned.len(),
                state_saved = report.state_saved,
                hall_of_fame = report.hall_of_fame_updated,
                "run complete"
            ),
            Ok(RunOutcome::Skipped(reason)) => tracing::info!(reason = %reason, "run skipped"),
            Err(e) => tracing::error!(error = %format!("{:#}", e), "run aborted"),
        }

        if args.once {
            break;
        }
        // Ensure one scheduling tick never runs twice
        tokio::time::sleep(Duration::from_secs(config.schedule.post_run_delay_s)).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("config.toml"));
        assert!(!args.once);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_flags_and_config_path() {
        let args = parse(&["--dry-run", "--config", "/etc/bot.toml", "--once"]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("/etc/bot.toml"));
        assert!(args.once);
        assert!(args.dry_run);
    }

    #[test]
    fn test_config_flag_needs_value() {
        assert!(parse(&["--config"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(parse(&["--simulate"]).is_err());
    }
}
