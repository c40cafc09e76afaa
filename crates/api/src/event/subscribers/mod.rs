use super::{
    publish_event::PublishEventUseCase,
    sync_event_reminders::{SyncEventRemindersTrigger, SyncEventRemindersUseCase},
};
use crate::shared::usecase::{execute, Subscriber};
use huddle_domain::Event;
use huddle_infra::HuddleContext;

pub struct ScheduleRemindersOnEventPublished;

#[async_trait::async_trait(?Send)]
impl Subscriber<PublishEventUseCase> for ScheduleRemindersOnEventPublished {
    async fn notify(&self, e: &Event, ctx: &HuddleContext) {
        let sync_event_reminders = SyncEventRemindersUseCase {
            request: SyncEventRemindersTrigger::EventPublished(e),
        };

        // Sideeffect, ignore result
        let _ = execute(sync_event_reminders, ctx).await;
    }
}
