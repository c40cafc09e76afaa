use crate::shared::{
    auth::Permission,
    usecase::{PermissionBoundary, UseCase},
};
use huddle_infra::HuddleContext;
use tracing::{error, info};

/// Deletes the `Event`s that have already started, together with their
/// `Participant`s
#[derive(Debug)]
pub struct DeletePastEventsUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeletePastEventsUseCase {
    /// Number of deleted events
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "DeletePastEvents";

    async fn execute(&mut self, ctx: &HuddleContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let deleted = ctx
            .repos
            .events
            .delete_all_before(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if deleted.is_empty() {
            return Ok(0);
        }

        let event_ids = deleted.iter().map(|e| e.id).collect::<Vec<_>>();
        ctx.announcement_locks.forget(&event_ids);
        match ctx.repos.participants.delete_by_events(&event_ids).await {
            Ok(res) => info!(
                "Deleted {} past events and {} participants",
                event_ids.len(),
                res.deleted_count
            ),
            Err(e) => {
                error!(
                    "Unable to delete participants of past events {:?}. Err: {:?}",
                    event_ids, e
                );
                return Err(UseCaseError::StorageError);
            }
        }

        Ok(event_ids.len())
    }
}

impl PermissionBoundary for DeletePastEventsUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::DeletePastEvents]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use huddle_domain::{NewEvent, Participant, RsvpStatus, ID};
    use huddle_infra::FixedSys;
    use std::sync::Arc;

    const NOW: i64 = 1_790_000_000_000;

    async fn store_event_with_participant(ctx: &HuddleContext, start_ts: i64) -> ID {
        let new_event = NewEvent {
            title: "Meetup".into(),
            start_ts,
            end_ts: None,
            address: "Office".into(),
            description: "".into(),
        };
        let event = ctx.repos.events.insert(&new_event, 0).await.unwrap();
        let participant = Participant {
            event_id: event.id,
            user_id: 1,
            username: None,
            fullname: "Ada".into(),
            status: RsvpStatus::Going,
            updated: 0,
        };
        ctx.repos.participants.upsert(&participant).await.unwrap();
        event.id
    }

    #[actix_web::main]
    #[test]
    async fn deletes_past_events_and_their_participants() {
        let mut ctx = HuddleContext::create_inmemory();
        ctx.sys = Arc::new(FixedSys(NOW));
        let past = store_event_with_participant(&ctx, NOW - 1).await;
        let upcoming = store_event_with_participant(&ctx, NOW + 1).await;
        drop(ctx.announcement_locks.lock(&past).await);
        drop(ctx.announcement_locks.lock(&upcoming).await);

        assert_eq!(execute(DeletePastEventsUseCase, &ctx).await.unwrap(), 1);
        assert_eq!(ctx.announcement_locks.len(), 1);

        assert!(ctx.repos.events.find(&past).await.unwrap().is_none());
        assert!(ctx.repos.participants.find_by_event(&past).await.unwrap().is_empty());
        assert!(ctx.repos.events.find(&upcoming).await.unwrap().is_some());
        assert_eq!(
            ctx.repos.participants.find_by_event(&upcoming).await.unwrap().len(),
            1
        );

        assert_eq!(execute(DeletePastEventsUseCase, &ctx).await.unwrap(), 0);
    }
}
