use crate::shared::usecase::UseCase;
use huddle_domain::{ReminderJobKey, RsvpStatus};
use huddle_infra::HuddleContext;
use tracing::{error, info, warn};

/// Sends the reminder of a fired `ReminderJob` to every `Participant` of the
/// event that answered going or maybe. The event and the participants are
/// loaded when the job fires, not when it was scheduled.
#[derive(Debug)]
pub struct SendEventRemindersUseCase {
    pub job: ReminderJobKey,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReminderDeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendEventRemindersUseCase {
    type Response = ReminderDeliveryReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendEventReminders";

    async fn execute(&mut self, ctx: &HuddleContext) -> Result<Self::Response, Self::Error> {
        let event_id = self.job.event_id;
        let event = match ctx.repos.events.find(&event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                warn!(
                    "Event {} of reminder job {} no longer exists, nothing to send",
                    event_id, self.job
                );
                return Ok(Default::default());
            }
            Err(e) => {
                error!("Unable to load event {}. Err: {:?}", event_id, e);
                return Err(UseCaseError::StorageError);
            }
        };

        let participants = ctx
            .repos
            .participants
            .find_by_event_and_status(&event_id, &RsvpStatus::notified())
            .await
            .map_err(|e| {
                error!(
                    "Unable to load participants of event {}. Err: {:?}",
                    event_id, e
                );
                UseCaseError::StorageError
            })?;

        let text = self.job.kind.render(&event, &ctx.config.timezone);
        let mut report = ReminderDeliveryReport::default();
        for participant in &participants {
            match ctx.chat.send_message(participant.user_id, &text).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(
                        "Unable to deliver reminder {} to user {}. Err: {:?}",
                        self.job, participant.user_id, e
                    );
                }
            }
        }

        info!(
            "Reminder {} for event {}: {} sent, {} failed",
            self.job, event_id, report.sent, report.failed
        );
        Ok(report)
    }
}
