use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use anyhow::anyhow;
use huddle_domain::{AnnouncementRef, Event, NewEvent, ID};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct InMemoryEventRepo {
    events: Mutex<Vec<Event>>,
    last_id: AtomicI64,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            last_id: AtomicI64::new(0),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &NewEvent, created: i64) -> anyhow::Result<Event> {
        let id = ID::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let event = Event::new(id, e.clone(), created);
        insert(&event, &self.events);
        Ok(event)
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        Ok(find(event_id, &self.events))
    }

    async fn find_upcoming(&self, now: i64) -> anyhow::Result<Vec<Event>> {
        let mut events = find_by(&self.events, |e| e.is_upcoming(now));
        events.sort_by_key(|e| (e.start_ts, e.id));
        Ok(events)
    }

    async fn set_announcement(
        &self,
        event_id: &ID,
        announcement: &AnnouncementRef,
    ) -> anyhow::Result<()> {
        if update(event_id, &self.events, |e| {
            e.announcement = Some(*announcement)
        }) {
            Ok(())
        } else {
            Err(anyhow!("Event with id: {} was not found", event_id))
        }
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        Ok(delete(event_id, &self.events))
    }

    async fn delete_all_before(&self, now: i64) -> anyhow::Result<Vec<Event>> {
        Ok(find_and_delete_by(&self.events, |e| e.start_ts < now))
    }
}
