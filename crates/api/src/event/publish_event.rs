use super::subscribers::ScheduleRemindersOnEventPublished;
use crate::shared::{
    auth::Permission,
    usecase::{PermissionBoundary, Subscriber, UseCase},
};
use huddle_domain::{Event, NewEvent, ResponseKeyboard, RsvpTally};
use huddle_infra::HuddleContext;
use tracing::{error, info};

/// Stores a new `Event` and posts its announcement with the response
/// keyboard in the community chat. Reminders are scheduled by the
/// subscriber once the announcement is posted.
#[derive(Debug)]
pub struct PublishEventUseCase {
    pub event: NewEvent,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    /// The announcement could not be posted, the event was discarded
    PublishFailed,
}

#[async_trait::async_trait(?Send)]
impl UseCase for PublishEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "PublishEvent";

    async fn execute(&mut self, ctx: &HuddleContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let mut event = ctx
            .repos
            .events
            .insert(&self.event, now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let keyboard = ResponseKeyboard::new(event.id, &RsvpTally::default());
        let text = event.announcement_text(&ctx.config.timezone);
        let announcement = match ctx
            .chat
            .send_announcement(ctx.config.community_chat_id, &text, &keyboard)
            .await
        {
            Ok(announcement) => announcement,
            Err(e) => {
                error!(
                    "Unable to post the announcement of event {}, discarding it. Err: {:?}",
                    event.id, e
                );
                if let Err(e) = ctx.repos.events.delete(&event.id).await {
                    error!("Unable to discard event {}. Err: {:?}", event.id, e);
                }
                return Err(UseCaseError::PublishFailed);
            }
        };

        // The announcement is public from here on, members can already answer
        // and the reminders have to be scheduled even if the ref is not stored
        if let Err(e) = ctx
            .repos
            .events
            .set_announcement(&event.id, &announcement)
            .await
        {
            error!(
                "Unable to store announcement {:?} of event {}. Err: {:?}",
                announcement, event.id, e
            );
        }
        event.announcement = Some(announcement);

        info!("Event {} published as {:?}", event.id, announcement);
        Ok(event)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleRemindersOnEventPublished)]
    }
}

impl PermissionBoundary for PublishEventUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::CreateEvent]
    }
}
