use chrono_tz::Tz;
use huddle_utils::create_random_secret;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_PORT: usize = 5000;
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_SHUTDOWN_GRACE_PERIOD_SECS: u64 = 10;
const DEFAULT_CLEANUP_INTERVAL_MINUTES: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    Postgres { connection_string: String },
    InMemory,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Token of the Telegram bot
    pub bot_token: String,
    /// Telegram users that are allowed to create events and run the
    /// administrative commands
    pub admin_ids: HashSet<i64>,
    /// Chat where event announcements are posted
    pub community_chat_id: i64,
    /// Port for the application to run on
    pub port: usize,
    /// Timezone used to parse dates entered by organizers and to display
    /// times. Stored timestamps are always UTC.
    pub timezone: Tz,
    /// Telegram sends this value in the `X-Telegram-Bot-Api-Secret-Token`
    /// header of every webhook request
    pub webhook_secret: String,
    pub telegram_api_url: String,
    pub storage: StorageConfig,
    /// How long shutdown waits for a reminder that is being sent
    pub shutdown_grace_period: Duration,
    /// Interval of the past events cleanup, `None` disables it
    pub cleanup_interval: Option<Duration>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    #[error("{0} environment variable has an invalid value: `{1}`")]
    Invalid(&'static str, String),
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = lookup("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let admin_ids = lookup("ADMIN_IDS").ok_or(ConfigError::Missing("ADMIN_IDS"))?;
        let admin_ids = admin_ids
            .split(',')
            .map(|id| id.trim().parse::<i64>())
            .collect::<Result<HashSet<_>, _>>()
            .map_err(|_| ConfigError::Invalid("ADMIN_IDS", admin_ids.clone()))?;

        let community_chat_id =
            lookup("COMMUNITY_CHAT_ID").ok_or(ConfigError::Missing("COMMUNITY_CHAT_ID"))?;
        let community_chat_id = match community_chat_id.trim().parse::<i64>() {
            Ok(id) if id != 0 => id,
            _ => return Err(ConfigError::Invalid("COMMUNITY_CHAT_ID", community_chat_id)),
        };

        let storage = match lookup("STORAGE").as_deref() {
            Some("inmemory") => StorageConfig::InMemory,
            Some("postgres") | None => StorageConfig::Postgres {
                connection_string: lookup("DATABASE_URL")
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some(other) => return Err(ConfigError::Invalid("STORAGE", other.to_string())),
        };

        let timezone = match lookup("TIMEZONE") {
            Some(timezone) => timezone
                .parse::<Tz>()
                .map_err(|_| ConfigError::Invalid("TIMEZONE", timezone.clone()))?,
            None => Tz::UTC,
        };

        let port = match lookup("PORT") {
            Some(port) => match port.parse::<usize>() {
                Ok(port) => port,
                Err(_) => {
                    warn!(
                        "The given PORT: {} is not valid, falling back to the default port: {}.",
                        port, DEFAULT_PORT
                    );
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };

        let webhook_secret = match lookup("WEBHOOK_SECRET") {
            Some(secret) => secret,
            None => {
                info!("Did not find WEBHOOK_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(32);
                info!(
                    "Webhook secret token was generated and set to: {}, register it with setWebhook",
                    secret
                );
                secret
            }
        };

        let telegram_api_url =
            lookup("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.into());

        let shutdown_grace_period = Duration::from_secs(parse_or_default(
            &lookup,
            "SHUTDOWN_GRACE_PERIOD_SECS",
            DEFAULT_SHUTDOWN_GRACE_PERIOD_SECS,
        )?);

        let cleanup_interval = match parse_or_default(
            &lookup,
            "CLEANUP_INTERVAL_MINUTES",
            DEFAULT_CLEANUP_INTERVAL_MINUTES,
        )? {
            0 => None,
            minutes => Some(Duration::from_secs(minutes * 60)),
        };

        Ok(Self {
            bot_token,
            admin_ids,
            community_chat_id,
            port,
            timezone,
            webhook_secret,
            telegram_api_url,
            storage,
            shutdown_grace_period,
            cleanup_interval,
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

fn parse_or_default<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key, value)),
        None => Ok(default),
    }
}

/// Settings for running without external dependencies, e.g. in tests
impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            admin_ids: HashSet::new(),
            community_chat_id: -100,
            port: DEFAULT_PORT,
            timezone: Tz::UTC,
            webhook_secret: create_random_secret(32),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.into(),
            storage: StorageConfig::InMemory,
            shutdown_grace_period: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_PERIOD_SECS),
            cleanup_interval: None,
        }
    }
}
