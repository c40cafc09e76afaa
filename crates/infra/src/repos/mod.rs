mod draft;
mod event;
mod participant;
mod shared;

pub use draft::{IDraftRepo, InMemoryDraftRepo};
pub use event::{IEventRepo, InMemoryEventRepo, PostgresEventRepo};
pub use participant::{IParticipantRepo, InMemoryParticipantRepo, PostgresParticipantRepo};
pub use shared::repo::DeleteResult;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub participants: Arc<dyn IParticipantRepo>,
    /// Unfinished event creation dialogues. They are short lived and are
    /// not persisted across restarts.
    pub drafts: Arc<dyn IDraftRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB EXECUTING MIGRATION ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB EXECUTING MIGRATION ... [done]");

        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            participants: Arc::new(PostgresParticipantRepo::new(pool)),
            drafts: Arc::new(InMemoryDraftRepo::new()),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepo::new()),
            participants: Arc::new(InMemoryParticipantRepo::new()),
            drafts: Arc::new(InMemoryDraftRepo::new()),
        }
    }
}
