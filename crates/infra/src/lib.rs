mod config;
mod locks;
mod reminders;
mod repos;
mod services;
mod system;

pub use config::{Config, ConfigError, StorageConfig};
pub use reminders::{FiredReminders, ReminderJobTable, ReminderJobsError};
pub use locks::EventLocks;
pub use repos::{DeleteResult, IDraftRepo, IEventRepo, IParticipantRepo, InMemoryEventRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{FixedSys, ISys};
use system::RealSys;

#[derive(Clone)]
pub struct HuddleContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub chat: Arc<dyn IChatClient>,
    pub reminder_jobs: ReminderJobTable,
    /// Serializes the edits of an announcement's response keyboard
    pub announcement_locks: EventLocks,
}

impl HuddleContext {
    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = match &config.storage {
            StorageConfig::Postgres { connection_string } => {
                Repos::create_postgres(connection_string).await?
            }
            StorageConfig::InMemory => Repos::create_inmemory(),
        };
        let chat = TelegramClient::new(&config.telegram_api_url, &config.bot_token);
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            chat: Arc::new(chat),
            reminder_jobs: ReminderJobTable::new(),
            announcement_locks: EventLocks::new(),
        })
    }

    /// Context without external dependencies. Outbound messages are recorded
    /// by an `InMemoryChatClient` instead of being delivered.
    pub fn create_inmemory() -> Self {
        Self::create_inmemory_with_chat(Arc::new(InMemoryChatClient::new()))
    }

    pub fn create_inmemory_with_chat(chat: Arc<dyn IChatClient>) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::default(),
            sys: Arc::new(RealSys {}),
            chat,
            reminder_jobs: ReminderJobTable::new(),
            announcement_locks: EventLocks::new(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<HuddleContext> {
    let config = Config::new()?;
    HuddleContext::create(config).await
}
