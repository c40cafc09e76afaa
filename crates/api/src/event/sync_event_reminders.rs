use crate::shared::usecase::UseCase;
use huddle_domain::{Event, ReminderJob};
use huddle_infra::HuddleContext;
use tracing::{error, info};

/// Registers the `ReminderJob`s of upcoming `Event`s in the reminder job table
#[derive(Debug)]
pub struct SyncEventRemindersUseCase<'a> {
    pub request: SyncEventRemindersTrigger<'a>,
}

#[derive(Debug)]
pub enum SyncEventRemindersTrigger<'a> {
    /// The announcement of the `Event` has just been posted
    EventPublished(&'a Event),
    /// The process has started and the job table is empty. Every job is
    /// derived again from the stored `Event`s.
    Startup,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

fn schedule_event_reminders(event: &Event, now: i64, ctx: &HuddleContext) -> usize {
    ReminderJob::for_event(event.id, event.start_ts, now)
        .into_iter()
        .filter(|job| ctx.reminder_jobs.schedule(*job, now))
        .count()
}

#[async_trait::async_trait(?Send)]
impl<'a> UseCase for SyncEventRemindersUseCase<'a> {
    /// Number of registered jobs
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncEventReminders";

    async fn execute(&mut self, ctx: &HuddleContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        match &self.request {
            SyncEventRemindersTrigger::EventPublished(event) => {
                Ok(schedule_event_reminders(event, now, ctx))
            }
            SyncEventRemindersTrigger::Startup => {
                let events = ctx.repos.events.find_upcoming(now).await.map_err(|e| {
                    error!("Unable to load upcoming events. Err: {:?}", e);
                    UseCaseError::StorageError
                })?;

                let mut scheduled = 0;
                let mut unannounced = 0;
                for event in &events {
                    // Publishing failed midway, nobody can respond to it
                    if event.announcement.is_none() {
                        unannounced += 1;
                        continue;
                    }
                    scheduled += schedule_event_reminders(event, now, ctx);
                }
                info!(
                    "Reconciled reminders of {} upcoming events: {} jobs scheduled, {} unannounced events skipped",
                    events.len(),
                    scheduled,
                    unannounced
                );
                Ok(scheduled)
            }
        }
    }
}
