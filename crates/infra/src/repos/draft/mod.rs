mod inmemory;

pub use inmemory::InMemoryDraftRepo;
use huddle_domain::EventDraft;

#[async_trait::async_trait]
pub trait IDraftRepo: Send + Sync {
    /// Stores the draft, replacing any earlier draft of the same user
    async fn save(&self, draft: &EventDraft) -> anyhow::Result<()>;
    async fn find(&self, user_id: i64) -> anyhow::Result<Option<EventDraft>>;
    async fn delete(&self, user_id: i64) -> anyhow::Result<Option<EventDraft>>;
}
