use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub subreddit: SubredditConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub moderation: ModerationConfig,
    #[serde(default)]
    pub flair: FlairConfig,
    pub hall_of_fame: HallOfFameConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubredditConfig {
    pub name: String,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedditConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_auth_base")]
    pub auth_base: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Maximum number of posts pulled from the daily top listing.
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
}

fn default_api_base() -> String {
    "https://oauth.reddit.com".to_string()
}
fn default_auth_base() -> String {
    "https://www.reddit.com".to_string()
}
fn default_request_timeout() -> u64 { 10_000 }
fn default_top_limit() -> usize { 100 }

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            auth_base: default_auth_base(),
            request_timeout_ms: default_request_timeout(),
            top_limit: default_top_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// Hour of day (UTC, 24h) at which the daily run fires.
    #[serde(default = "default_run_hour")]
    pub run_hour_utc: u32,
    #[serde(default = "default_true")]
    pub run_on_start: bool,
    /// Pause after each run so one scheduling tick never fires twice.
    #[serde(default = "default_post_run_delay")]
    pub post_run_delay_s: u64,
}

fn default_run_hour() -> u32 { 12 }
fn default_post_run_delay() -> u64 { 2 }
fn default_true() -> bool { true }

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_hour_utc: default_run_hour(),
            run_on_start: true,
            post_run_delay_s: default_post_run_delay(),
        }
    }
}

/// What to do when exactly one eligible post exists for the day.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SingleEligiblePolicy {
    /// The lone post is both winner and loser.
    #[default]
    SelfPair,
    /// Treat the day as an empty selection.
    Skip,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModerationConfig {
    #[serde(default)]
    pub ban_users: bool,
    #[serde(default = "default_true")]
    pub sticky_announcement: bool,
    /// Prefix placed before usernames; "u/" pings them, "" does not.
    #[serde(default = "default_user_mention")]
    pub user_mention: String,
    #[serde(default = "default_exempt_flair")]
    pub exempt_flair_text: String,
    #[serde(default)]
    pub single_eligible: SingleEligiblePolicy,
}

fn default_user_mention() -> String {
    "u/".to_string()
}
fn default_exempt_flair() -> String {
    "Exempt".to_string()
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            ban_users: false,
            sticky_announcement: true,
            user_mention: default_user_mention(),
            exempt_flair_text: default_exempt_flair(),
            single_eligible: SingleEligiblePolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FlairConfig {
    pub announcement_flair_id: Option<String>,
    pub winner_template_id: Option<String>,
    pub loser_template_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HallOfFameConfig {
    /// Id of the log post. Must be created by hand on the bot account.
    pub submission_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

fn default_state_path() -> PathBuf {
    PathBuf::from("goldilocks-state.json")
}

impl Default for StateConfig {
    fn default() -> Self {
        Self { path: default_state_path() }
    }
}

/// Login for the bot account. The account must moderate the subreddit.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.schedule.run_hour_utc > 23 {
            anyhow::bail!("schedule.run_hour_utc must be 0-23, got {}", self.schedule.run_hour_utc);
        }
        if self.hall_of_fame.submission_id.trim().is_empty() {
            anyhow::bail!("hall_of_fame.submission_id cannot be empty");
        }
        if self.reddit.top_limit == 0 {
            anyhow::bail!("reddit.top_limit must be > 0");
        }
        Ok(())
    }

    /// Apply the legacy environment toggles on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("BAN_USERS") {
            self.moderation.ban_users = env_flag(&v);
        }
        if let Some(v) = get("STICKY_ANNOUNCEMENT") {
            self.moderation.sticky_announcement = env_flag(&v);
        }
        if let Some(v) = get("RUN_ON_START") {
            self.schedule.run_on_start = env_flag(&v);
        }
        if let Some(v) = get("USER_MENTION") {
            if !v.is_empty() {
                self.moderation.user_mention = v;
            }
        }
    }

    /// Export `KEY=VALUE` pairs from `.env` without overriding variables
    /// already set in the environment. A missing file is fine.
    pub fn load_env_file() {
        let Ok(raw) = std::fs::read_to_string(ENV_FILE) else {
            return;
        };
        for (key, value) in parse_env_lines(&raw) {
            if std::env::var_os(key).is_none() {
                std::env::set_var(key, value);
            }
        }
    }

    /// Reddit login comes from environment variables, or is prompted at startup.
    /// Prompted values are saved to .env for future runs.
    pub fn credentials() -> Result<Credentials> {
        Ok(Credentials {
            client_id: env_or_prompt("REDDIT_CLIENT_ID", "Reddit client id")?,
            client_secret: env_or_prompt("REDDIT_CLIENT_SECRET", "Reddit client secret")?,
            username: env_or_prompt("REDDIT_USERNAME", "Reddit username")?,
            password: env_or_prompt("REDDIT_PASSWORD", "Reddit password")?,
        })
    }
}

/// Only the literal "True" switches a flag on.
fn env_flag(value: &str) -> bool {
    value == "True"
}

fn parse_env_lines(content: &str) -> Vec<(&str, &str)> {
    let content = content.trim_start_matches('\u{feff}');
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            pairs.push((key.trim(), unquote(value.trim())));
        }
    }
    pairs
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    value
}

/// Read `key` from the environment, or ask for it on the terminal and
/// remember the answer in `.env`.
fn env_or_prompt(key: &str, label: &str) -> Result<String> {
    if let Some(value) = std::env::var(key).ok().map(|v| clean_value(&v)).filter(|v| !v.is_empty()) {
        return Ok(value);
    }

    print!("  {} > ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .with_context(|| format!("failed to read {}", label))?;
    let value = clean_value(&line);
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }

    std::env::set_var(key, &value);
    if let Err(e) = append_env_line(Path::new(ENV_FILE), key, &value) {
        tracing::warn!(key, error = %e, "could not save credential to {}", ENV_FILE);
    }
    Ok(value)
}

/// Drop invisible characters that sneak in through copy and paste.
fn clean_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\u{feff}' | '\u{200b}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Append `KEY=VALUE` to an env file, starting a new line if the file
/// does not already end with one.
fn append_env_line(path: &Path, key: &str, value: &str) -> io::Result<()> {
    let needs_newline = std::fs::read(path)
        .map(|bytes| bytes.last().is_some_and(|b| *b != b'\n'))
        .unwrap_or(false);
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    if needs_newline {
        writeln!(file)?;
    }
    writeln!(file, "{}={}", key, value)
}
