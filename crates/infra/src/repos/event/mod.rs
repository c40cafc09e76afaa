mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;
use huddle_domain::{AnnouncementRef, Event, NewEvent, ID};

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    /// Stores the event and returns it with the id assigned by the store
    async fn insert(&self, e: &NewEvent, created: i64) -> anyhow::Result<Event>;
    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>>;
    /// Events starting strictly after `now`, ordered by start time
    async fn find_upcoming(&self, now: i64) -> anyhow::Result<Vec<Event>>;
    async fn set_announcement(
        &self,
        event_id: &ID,
        announcement: &AnnouncementRef,
    ) -> anyhow::Result<()>;
    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<Event>>;
    /// Deletes the events that started strictly before `now`
    async fn delete_all_before(&self, now: i64) -> anyhow::Result<Vec<Event>>;
}
