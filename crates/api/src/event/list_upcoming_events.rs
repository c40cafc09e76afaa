use crate::shared::{
    auth::Permission,
    usecase::{PermissionBoundary, UseCase},
};
use huddle_domain::{Event, Participant, RsvpStatus};
use huddle_infra::HuddleContext;

/// Upcoming `Event`s together with the `Participant`s that plan to come
#[derive(Debug)]
pub struct ListUpcomingEventsUseCase;

#[derive(Debug)]
pub struct UpcomingEvent {
    pub event: Event,
    pub going: Vec<Participant>,
    pub maybe: Vec<Participant>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListUpcomingEventsUseCase {
    type Response = Vec<UpcomingEvent>;

    type Error = UseCaseError;

    const NAME: &'static str = "ListUpcomingEvents";

    async fn execute(&mut self, ctx: &HuddleContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let events = ctx
            .repos
            .events
            .find_upcoming(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut upcoming = Vec::with_capacity(events.len());
        for event in events {
            let participants = ctx
                .repos
                .participants
                .find_by_event(&event.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            let (going, maybe): (Vec<_>, Vec<_>) = participants
                .into_iter()
                .filter(|p| p.status.is_notified())
                .partition(|p| p.status == RsvpStatus::Going);
            upcoming.push(UpcomingEvent {
                event,
                going,
                maybe,
            });
        }

        Ok(upcoming)
    }
}

impl PermissionBoundary for ListUpcomingEventsUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ListParticipants]
    }
}
