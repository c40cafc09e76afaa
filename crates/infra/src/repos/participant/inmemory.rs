use super::IParticipantRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use huddle_domain::{Participant, RsvpStatus, ID};
use std::sync::Mutex;

pub struct InMemoryParticipantRepo {
    participants: Mutex<Vec<Participant>>,
}

impl InMemoryParticipantRepo {
    pub fn new() -> Self {
        Self {
            participants: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IParticipantRepo for InMemoryParticipantRepo {
    async fn upsert(&self, participant: &Participant) -> anyhow::Result<Participant> {
        let mut participants = lock(&self.participants);
        let existing = participants
            .iter_mut()
            .find(|p| p.event_id == participant.event_id && p.user_id == participant.user_id);
        match existing {
            Some(existing) => {
                existing.status = participant.status;
                existing.updated = participant.updated;
                Ok(existing.clone())
            }
            None => {
                participants.push(participant.clone());
                Ok(participant.clone())
            }
        }
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>> {
        Ok(find_by(&self.participants, |p| p.event_id == *event_id))
    }

    async fn find_by_event_and_status(
        &self,
        event_id: &ID,
        statuses: &[RsvpStatus],
    ) -> anyhow::Result<Vec<Participant>> {
        Ok(find_by(&self.participants, |p| {
            p.event_id == *event_id && statuses.contains(&p.status)
        }))
    }

    async fn delete_by_events(&self, event_ids: &[ID]) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.participants, |p| {
            event_ids.contains(&p.event_id)
        }))
    }
}
