mod inmemory;
mod postgres;

use super::shared::repo::DeleteResult;
pub use inmemory::InMemoryParticipantRepo;
pub use postgres::PostgresParticipantRepo;
use huddle_domain::{Participant, RsvpStatus, ID};

#[async_trait::async_trait]
pub trait IParticipantRepo: Send + Sync {
    /// Stores the answer of the user. When the user already answered for the
    /// event, only the status and the update time are overwritten.
    async fn upsert(&self, participant: &Participant) -> anyhow::Result<Participant>;
    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>>;
    async fn find_by_event_and_status(
        &self,
        event_id: &ID,
        statuses: &[RsvpStatus],
    ) -> anyhow::Result<Vec<Participant>>;
    async fn delete_by_events(&self, event_ids: &[ID]) -> anyhow::Result<DeleteResult>;
}
